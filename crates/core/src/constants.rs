//! Feste Tabellen: Sprachen, System-Instruktionen je Modus, Preisplaene

use serde::Serialize;

use crate::types::{Language, SubscriptionPlan, UserMode};

/// Alle unterstuetzten Antwortsprachen
pub const LANGUAGES: [Language; 10] = [
    Language { code: "en", name: "English", native_name: "English" },
    Language { code: "hi", name: "Hindi", native_name: "हिन्दी" },
    Language { code: "ta", name: "Tamil", native_name: "தமிழ்" },
    Language { code: "te", name: "Telugu", native_name: "తెలుగు" },
    Language { code: "mr", name: "Marathi", native_name: "मराठी" },
    Language { code: "bn", name: "Bengali", native_name: "বাংলা" },
    Language { code: "gu", name: "Gujarati", native_name: "ગુજરાતી" },
    Language { code: "kn", name: "Kannada", native_name: "ಕನ್ನಡ" },
    Language { code: "ml", name: "Malayalam", native_name: "മലയാളം" },
    Language { code: "pa", name: "Punjabi", native_name: "ਪੰਜਾਬੀ" },
];

/// Sucht eine Sprache anhand ihres Codes (Gross-/Kleinschreibung egal)
pub fn sprache_finden(code: &str) -> Option<&'static Language> {
    let code = code.trim();
    LANGUAGES.iter().find(|l| l.code.eq_ignore_ascii_case(code))
}

const CITIZEN_INSTRUCTION: &str = "You are Sanvidhan AI, a helpful companion for Indian Citizens.
Your primary task is to explain the Constitution of India in simple language using real-life examples.
- WHEN A USER ASKS FOR A SPECIFIC ARTICLE:
  1. Retrieve the EXACT text of the Article from the Constitution PDF.
  2. Provide a \"Simple Explanation\" that a common citizen can understand.
  3. Mention how it affects daily life.
- ALWAYS reference relevant Articles, Parts, or Schedules.
- If information is not in the constitution, strictly say \"Not found in the Constitution\".
- Maintain a tone that is empowering and citizen-friendly.";

const STUDENT_INSTRUCTION: &str = "You are Sanvidhan AI, a pedagogical expert on the Indian Constitution.
Your goal is to help students prepare for exams and understand the document in depth.
- WHEN A USER ASKS FOR A SPECIFIC ARTICLE:
  1. Retrieve the ORIGINAL TEXT of the Article.
  2. Provide a \"Legal Summary\" and \"Key Clauses\".
  3. Mention any significant Amendments or Schedules linked to it.
- Offer summaries and historical context where relevant.
- Be ready to provide Multiple Choice Questions (MCQs) if asked.
- Reference Articles, Parts, and Schedules strictly.";

const LEGAL_INSTRUCTION: &str = "You are Sanvidhan AI, a legal research assistant specialized in Constitutional Law.
Your goal is to provide case-based constitutional understanding and precise analysis.
- WHEN A USER ASKS FOR A SPECIFIC ARTICLE:
  1. Provide the TECHNICAL text.
  2. Analyze \"Rights vs Restrictions\".
  3. Discuss the \"Judicial Interpretation\" or Landmark Case Laws associated with it.
- Explain Emergency provisions and complex constitutional nuances.
- Maintain high precision in citing Articles, Parts, and Schedules.";

/// System-Instruktion fuer den gegebenen Modus
pub fn system_instruction(mode: UserMode) -> &'static str {
    match mode {
        UserMode::Citizen => CITIZEN_INSTRUCTION,
        UserMode::Student => STUDENT_INSTRUCTION,
        UserMode::Legal => LEGAL_INSTRUCTION,
    }
}

/// Eintrag der Preistabelle
#[derive(Debug, Clone, Serialize)]
pub struct PricingPlan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    pub features: &'static [&'static str],
    /// Plan der nach erfolgreicher Zahlung aktiviert wird
    pub plan: SubscriptionPlan,
}

const PRICING_PLANS: [PricingPlan; 3] = [
    PricingPlan {
        id: "free",
        name: "Free",
        price: "₹0",
        features: &["5 Questions / Day", "Basic Chatbot Answers", "Citizen Mode Only"],
        plan: SubscriptionPlan::Free,
    },
    PricingPlan {
        id: "premium",
        name: "Premium",
        price: "₹499/yr",
        features: &[
            "Unlimited Questions",
            "Advanced Legal Explanations",
            "Multi-language Voice Support",
            "All Modes Enabled",
        ],
        plan: SubscriptionPlan::Premium,
    },
    PricingPlan {
        id: "institutional",
        name: "Institutional",
        price: "₹2999/yr",
        features: &[
            "Up to 50 Users",
            "Exam Preparation Tools",
            "API Access (Coming Soon)",
            "Bulk Bookmark Exports",
        ],
        plan: SubscriptionPlan::StudentInstitution,
    },
];

/// Alle Preisplaene in Anzeigereihenfolge
pub fn pricing_plans() -> &'static [PricingPlan] {
    &PRICING_PLANS
}
