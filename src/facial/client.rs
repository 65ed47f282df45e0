use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error};

use super::error::FacialError;
use super::types::{
    Reconhecimento, ReconhecimentoRequest, ReconhecimentoResponse, UploadFacialRequest,
    UploadFacialResponse,
};

/// Operations the time clock needs from the recognition service.
pub trait ReconhecedorFacial {
    /// Matches the image against the candidates.
    async fn reconhecer(&self, req: &ReconhecimentoRequest) -> Result<Reconhecimento, FacialError>;

    /// Validates and stores an enrolment photo, returning its storage path.
    async fn enviar_facial(&self, req: &UploadFacialRequest) -> Result<String, FacialError>;
}

pub struct FaceRecognitionClient {
    client: Client,
    base_url: String,
}

impl FaceRecognitionClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FacialError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn post<B, R>(&self, rota: &str, body: &B) -> Result<R, FacialError>
    where
        B: serde::Serialize,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{rota}", self.base_url);
        debug!(%url, "calling face recognition service");
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());
            error!(status = status.as_u16(), %message, "face recognition service error");
            return Err(FacialError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<R>().await?)
    }
}

impl ReconhecedorFacial for FaceRecognitionClient {
    async fn reconhecer(&self, req: &ReconhecimentoRequest) -> Result<Reconhecimento, FacialError> {
        let body: ReconhecimentoResponse = self.post("/recognize-with-collaborators", req).await?;
        if !body.success {
            return Err(FacialError::Recusado(
                body.error
                    .unwrap_or_else(|| "Colaborador não reconhecido".to_string()),
            ));
        }

        let colaborador_id = body
            .colaborador_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| FacialError::RespostaInvalida("colaborador_id ausente".into()))?;
        Ok(Reconhecimento {
            colaborador_id,
            colaborador_nome: body.colaborador_nome.unwrap_or_default(),
            score: body.score,
        })
    }

    async fn enviar_facial(&self, req: &UploadFacialRequest) -> Result<String, FacialError> {
        let body: UploadFacialResponse = self.post("/upload-facial", req).await?;
        if !body.success {
            return Err(FacialError::Recusado(
                body.error
                    .unwrap_or_else(|| "Erro ao fazer upload de facial".to_string()),
            ));
        }
        body.url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| FacialError::RespostaInvalida("url ausente".into()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::facial::ColaboradorFacial;

    fn client(server: &MockServer) -> FaceRecognitionClient {
        FaceRecognitionClient::new(format!("{}/", server.uri()), Duration::from_secs(5)).unwrap()
    }

    fn pedido() -> ReconhecimentoRequest {
        ReconhecimentoRequest {
            image_base64: "aW1hZ2Vt".into(),
            latitude: Some("-23.55".into()),
            longitude: None,
            dispositivo_info: Some("totem-01".into()),
            colaboradores: vec![ColaboradorFacial {
                id: "c1".into(),
                nome_completo: "Ana Souza".into(),
                foto_url: "http://app/api/nextcloud/image?path=x".into(),
            }],
        }
    }

    #[tokio::test]
    async fn reconhecer_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize-with-collaborators"))
            .and(body_partial_json(json!({
                "image_base64": "aW1hZ2Vt",
                "dispositivo_info": "totem-01",
                "colaboradores": [{"id": "c1", "nome_completo": "Ana Souza"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "colaborador_id": "c1",
                "colaborador_nome": "Ana Souza",
                "score": 0.93
            })))
            .expect(1)
            .mount(&server)
            .await;

        let r = client(&server).reconhecer(&pedido()).await.unwrap();
        assert_eq!(r.colaborador_id, "c1");
        assert_eq!(r.score, Some(0.93));
    }

    #[tokio::test]
    async fn reconhecer_unrecognized_uses_default_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/recognize-with-collaborators"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;

        let err = client(&server).reconhecer(&pedido()).await.unwrap_err();
        assert_eq!(err.to_string(), "Colaborador não reconhecido");
    }

    #[tokio::test]
    async fn reconhecer_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client(&server).reconhecer(&pedido()).await.unwrap_err();
        assert!(matches!(err, FacialError::Api { status: 500, ref message } if message == "boom"));
    }

    #[tokio::test]
    async fn reconhecer_success_without_id_is_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        let err = client(&server).reconhecer(&pedido()).await.unwrap_err();
        assert!(matches!(err, FacialError::RespostaInvalida(_)));
    }

    #[tokio::test]
    async fn enviar_facial_returns_storage_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload-facial"))
            .and(body_partial_json(json!({"colaborador_id": "c1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "url": "colaboradores/c1/facial_1700000000000.jpg"
            })))
            .mount(&server)
            .await;

        let req = UploadFacialRequest {
            colaborador_id: "c1".into(),
            image_base64: "data:image/jpeg;base64,aW1hZ2Vt".into(),
        };
        let url = client(&server).enviar_facial(&req).await.unwrap();
        assert_eq!(url, "colaboradores/c1/facial_1700000000000.jpg");
    }

    #[tokio::test]
    async fn enviar_facial_rejected_by_service() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/upload-facial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "Nenhum rosto detectado"
            })))
            .mount(&server)
            .await;

        let req = UploadFacialRequest {
            colaborador_id: "c1".into(),
            image_base64: "data:image/png;base64,AA==".into(),
        };
        let err = client(&server).enviar_facial(&req).await.unwrap_err();
        assert_eq!(err.to_string(), "Nenhum rosto detectado");
    }
}
