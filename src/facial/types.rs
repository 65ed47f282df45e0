//! Corpos JSON trocados com o serviço de reconhecimento facial.
//!
//! Os nomes dos campos seguem o contrato do serviço (snake_case).

use serde::{Deserialize, Serialize};

/// Candidato enviado para comparação: um colaborador ativo com foto cadastrada.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColaboradorFacial {
    pub id: String,
    pub nome_completo: String,
    pub foto_url: String,
}

/// Corpo de `POST /recognize-with-collaborators`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconhecimentoRequest {
    /// Imagem capturada em base64 (pode vir como data URL).
    pub image_base64: String,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub dispositivo_info: Option<String>,
    pub colaboradores: Vec<ColaboradorFacial>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconhecimentoResponse {
    pub success: bool,
    pub colaborador_id: Option<String>,
    pub colaborador_nome: Option<String>,
    pub score: Option<f64>,
    pub error: Option<String>,
}

/// Colaborador identificado na imagem.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconhecimento {
    pub colaborador_id: String,
    pub colaborador_nome: String,
    pub score: Option<f64>,
}

/// Corpo de `POST /upload-facial`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadFacialRequest {
    pub colaborador_id: String,
    /// Data URL (`data:<mime>;base64,<dados>`).
    pub image_base64: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadFacialResponse {
    pub success: bool,
    /// Caminho do arquivo no armazenamento WebDAV.
    pub url: Option<String>,
    pub error: Option<String>,
}
