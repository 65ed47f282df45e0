use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use tracing::{debug, error};

use super::error::NextcloudError;

/// Operations on the file store, with paths relative to the WebDAV root.
pub trait ArmazenamentoArquivos {
    async fn existe(&self, caminho: &str) -> Result<bool, NextcloudError>;

    /// Creates the directory and any missing parents.
    async fn criar_diretorio(&self, caminho: &str) -> Result<(), NextcloudError>;

    async fn enviar(&self, caminho: &str, conteudo: Vec<u8>, content_type: &str) -> Result<(), NextcloudError>;

    async fn baixar(&self, caminho: &str) -> Result<Vec<u8>, NextcloudError>;

    async fn garantir_diretorio(&self, caminho: &str) -> Result<(), NextcloudError> {
        if !self.existe(caminho).await? {
            self.criar_diretorio(caminho).await?;
        }
        Ok(())
    }
}

pub struct NextcloudClient {
    client: Client,
    base_url: String,
    usuario: String,
    senha: String,
}

fn segmentos(caminho: &str) -> impl Iterator<Item = &str> {
    caminho.split('/').filter(|s| !s.is_empty())
}

impl NextcloudClient {
    pub fn new(
        base_url: impl Into<String>,
        usuario: impl Into<String>,
        senha: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NextcloudError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            usuario: usuario.into(),
            senha: senha.into(),
        })
    }

    fn url(&self, caminho: &str) -> String {
        let mut url = self.base_url.clone();
        for s in segmentos(caminho) {
            url.push('/');
            url.push_str(&urlencoding::encode(s));
        }
        url
    }

    fn request(&self, metodo: Method, caminho: &str) -> reqwest::RequestBuilder {
        self.client
            .request(metodo, self.url(caminho))
            .basic_auth(&self.usuario, Some(&self.senha))
    }

    async fn falha(operacao: &'static str, caminho: &str, response: reqwest::Response) -> NextcloudError {
        let status = response.status().as_u16();
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "unknown error".to_string());
        error!(operacao, caminho, status, "WebDAV request failed");
        NextcloudError::Api {
            operacao,
            caminho: caminho.to_string(),
            status,
            message,
        }
    }
}

// Extension methods; the names are fixed ASCII tokens.
fn propfind() -> Method {
    Method::from_bytes(b"PROPFIND").unwrap_or(Method::GET)
}

fn mkcol() -> Method {
    Method::from_bytes(b"MKCOL").unwrap_or(Method::PUT)
}

impl ArmazenamentoArquivos for NextcloudClient {
    async fn existe(&self, caminho: &str) -> Result<bool, NextcloudError> {
        let response = self.request(propfind(), caminho).header("Depth", "0").send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            s if s.is_success() => Ok(true),
            _ => Err(Self::falha("PROPFIND", caminho, response).await),
        }
    }

    async fn criar_diretorio(&self, caminho: &str) -> Result<(), NextcloudError> {
        let mut atual = String::new();
        for s in segmentos(caminho) {
            if !atual.is_empty() {
                atual.push('/');
            }
            atual.push_str(s);
            if self.existe(&atual).await? {
                continue;
            }

            debug!(caminho = %atual, "MKCOL");
            let response = self.request(mkcol(), &atual).send().await?;
            // 405: created concurrently by someone else.
            if !response.status().is_success() && response.status() != StatusCode::METHOD_NOT_ALLOWED {
                let err = Self::falha("MKCOL", &atual, response).await;
                return Err(NextcloudError::Diretorio(err.to_string()));
            }
        }
        Ok(())
    }

    async fn enviar(&self, caminho: &str, conteudo: Vec<u8>, content_type: &str) -> Result<(), NextcloudError> {
        debug!(caminho, bytes = conteudo.len(), "PUT");
        let response = self
            .request(Method::PUT, caminho)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(conteudo)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::falha("PUT", caminho, response).await);
        }
        Ok(())
    }

    async fn baixar(&self, caminho: &str) -> Result<Vec<u8>, NextcloudError> {
        let response = self.request(Method::GET, caminho).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(NextcloudError::NaoEncontrado(caminho.to_string())),
            s if s.is_success() => Ok(response.bytes().await?.to_vec()),
            _ => Err(Self::falha("GET", caminho, response).await),
        }
    }
}
