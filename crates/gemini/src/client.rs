//! GeminiClient – HTTP-Implementierung von Chat und Sprachsynthese
//!
//! Beide Dienste laufen ueber `POST {basis}/models/{modell}:generateContent`.
//! Der API-Schluessel geht im Header `x-goog-api-key` mit.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::{ChatAnfrage, SpeechSynthesizer, TextGenerator};
use crate::config::{api_schluessel_aus_env, GeminiConfig};
use crate::error::{GeminiError, GeminiResult};
use crate::prompt::{build_contents, FALLBACK_ANTWORT};
use crate::wire::{
    ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
    SpeechConfig,
};

const USER_AGENT: &str = concat!("sanvidhan/", env!("CARGO_PKG_VERSION"));

/// Client fuer die Gemini REST-API
pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
    api_key: String,
}

impl GeminiClient {
    /// Erstellt einen Client mit explizitem API-Schluessel
    pub fn neu(config: GeminiConfig, api_key: impl Into<String>) -> GeminiResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_sekunden))
            .build()?;

        Ok(Self {
            http,
            config,
            api_key: api_key.into(),
        })
    }

    /// Erstellt einen Client mit dem Schluessel aus der Umgebung
    pub fn aus_umgebung(config: GeminiConfig) -> GeminiResult<Self> {
        let key = api_schluessel_aus_env().ok_or(GeminiError::KeinApiSchluessel)?;
        Self::neu(config, key)
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpunkt(&self, modell: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_basis_url.trim_end_matches('/'),
            modell
        )
    }

    async fn senden(
        &self,
        modell: &str,
        anfrage: &GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = self.endpunkt(modell);
        debug!(modell, turns = anfrage.contents.len(), "Sende generateContent");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(anfrage)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let nachricht = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            warn!(status = status.as_u16(), modell, "Gemini-Anfrage fehlgeschlagen");
            return Err(GeminiError::Api {
                status: status.as_u16(),
                nachricht,
            });
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GeminiError::UngueltigeAntwort(e.to_string()))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, anfrage: ChatAnfrage<'_>) -> GeminiResult<String> {
        let contents = build_contents(anfrage.verlauf, anfrage.mode, anfrage.language, anfrage.pdf_base64)?;
        let request = GenerateContentRequest {
            contents,
            generation_config: Some(GenerationConfig {
                temperature: Some(self.config.temperatur),
                top_p: Some(self.config.top_p),
                top_k: Some(self.config.top_k),
                ..Default::default()
            }),
        };

        let response = self.senden(&self.config.chat_modell, &request).await?;
        Ok(response.text().unwrap_or_else(|| FALLBACK_ANTWORT.to_string()))
    }
}

#[async_trait]
impl SpeechSynthesizer for GeminiClient {
    async fn synthesize(&self, text: &str) -> GeminiResult<Option<String>> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part::text(text)],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".into()]),
                speech_config: Some(SpeechConfig::stimme(self.config.stimme.clone())),
                ..Default::default()
            }),
        };

        let response = self.senden(&self.config.tts_modell, &request).await?;
        Ok(response.inline_data().map(|d| d.data.clone()))
    }
}
