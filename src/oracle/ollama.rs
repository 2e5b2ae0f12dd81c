//! Ollama-backed question answering.
//!
//! Retrieval is local (see `glossary`); generation is delegated to an Ollama
//! server via its `/api/generate` endpoint with streaming disabled.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::OracleConfig;
use crate::error::OracleError;
use crate::oracle::Oracle;
use crate::oracle::glossary::{Glossary, GlossaryEntry};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct OllamaOracle {
    client: Client,
    url: String,
    model: String,
    glossary: Glossary,
    top_k: usize,
}

impl OllamaOracle {
    pub fn new(glossary: Glossary, config: &OracleConfig) -> Result<Self, OracleError> {
        let url = format!("{}/api/generate", config.ollama_host.trim_end_matches('/'));
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OracleError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            url,
            model: config.ollama_model.clone(),
            glossary,
            top_k: config.top_k.max(1),
        })
    }

    fn generate(&self, prompt: &str) -> Result<String, OracleError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let resp = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| OracleError::Request {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(OracleError::Status {
                url: self.url.clone(),
                status: resp.status().as_u16(),
            });
        }

        let parsed: GenerateResponse = resp.json().map_err(|e| OracleError::InvalidResponse {
            url: self.url.clone(),
            message: e.to_string(),
        })?;

        Ok(parsed.response.trim().to_string())
    }
}

impl Oracle for OllamaOracle {
    fn answer(&self, question: &str) -> Result<String, OracleError> {
        let context = self.glossary.retrieve(question, self.top_k);
        tracing::debug!(
            model = %self.model,
            context_entries = context.len(),
            "querying ollama"
        );
        let prompt = build_prompt(question, &context);
        self.generate(&prompt)
    }
}

fn build_prompt(question: &str, context: &[&GlossaryEntry]) -> String {
    let mut out = String::new();
    out.push_str(
        "Answer the question using only the glossary entries below. \
         If they do not contain the answer, say that you don't know.\n\n",
    );
    out.push_str("Glossary:\n");
    if context.is_empty() {
        out.push_str("(no matching entries)\n");
    }
    for entry in context {
        out.push_str(&format!("- {}: {}\n", entry.tag, entry.description));
    }
    out.push_str(&format!("\nQuestion: {question}\nAnswer:"));
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn config(host: &str) -> OracleConfig {
        OracleConfig {
            glossary_path: PathBuf::from("unused.txt"),
            top_k: 2,
            ollama_host: host.to_string(),
            ollama_model: "mistral".to_string(),
            timeout_secs: 2,
            dataset_path: None,
        }
    }

    #[test]
    fn prompt_lists_context_and_question() {
        let glossary = Glossary::parse("us-gaap:Assets = Total assets.\n");
        let context = glossary.retrieve("What is us-gaap:Assets?", 2);
        let prompt = build_prompt("What is us-gaap:Assets?", &context);
        assert!(prompt.contains("- us-gaap:Assets: Total assets.\n"));
        assert!(prompt.ends_with("Question: What is us-gaap:Assets?\nAnswer:"));
    }

    #[test]
    fn prompt_marks_missing_context() {
        let prompt = build_prompt("anything", &[]);
        assert!(prompt.contains("(no matching entries)"));
    }

    #[test]
    fn endpoint_joins_host_without_double_slash() {
        let oracle = OllamaOracle::new(Glossary::parse("a = b\n"), &config("http://localhost:11434/")).unwrap();
        assert_eq!(oracle.url, "http://localhost:11434/api/generate");
    }

    #[test]
    fn request_body_disables_streaming() {
        let body = GenerateRequest {
            model: "mistral",
            prompt: "hi",
            stream: false,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["stream"], serde_json::Value::Bool(false));
        assert_eq!(json["model"], "mistral");
    }

    #[test]
    fn unreachable_server_is_a_request_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let host = format!("http://127.0.0.1:{port}");
        let oracle = OllamaOracle::new(Glossary::parse("a = b\n"), &config(&host)).unwrap();
        let err = oracle.answer("what is a?").unwrap_err();
        assert!(matches!(err, OracleError::Request { .. }));
    }
}
