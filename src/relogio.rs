use anyhow::{bail, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cadastros::colaborador;
use crate::error::RhError;
use crate::facial::{ColaboradorFacial, ReconhecedorFacial, ReconhecimentoRequest, UploadFacialRequest};
use crate::nextcloud::{paths, ArmazenamentoArquivos};
use crate::ponto::{self, Jornada, MarcacaoPonto, MetodoMarcacao, NovaMarcacao, TipoMarcacao};
use crate::store::Dados;

/// An image read from disk or received from a capture device.
pub struct Imagem {
    pub nome: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Imagem {
    /// `data:<mime>;base64,<bytes>`
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// Where a capture happened.
#[derive(Debug, Clone, Default)]
pub struct Captura {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub dispositivo_info: Option<String>,
}

/// A punch recorded by facial recognition.
#[derive(Debug, Clone, Serialize)]
pub struct PontoReconhecido {
    pub colaborador_id: String,
    pub colaborador_nome: String,
    pub score: Option<f64>,
    pub tipo: TipoMarcacao,
    pub marcacao: MarcacaoPonto,
}

/// Runs the facial time clock and the image uploads against the external
/// services.
pub struct Relogio<F, A> {
    pub reconhecedor: F,
    pub armazenamento: A,
    pub jornada: Jornada,
    /// Base URL of the image proxy.
    pub app_url: String,
    pub max_upload_bytes: usize,
}

impl<F: ReconhecedorFacial, A: ArmazenamentoArquivos> Relogio<F, A> {
    fn validar_imagem(&self, imagem: &Imagem) -> Result<()> {
        if !imagem.mime.starts_with("image/") {
            return Err(RhError::validacao("Apenas arquivos de imagem são permitidos").into());
        }
        if imagem.bytes.len() > self.max_upload_bytes {
            let mb = self.max_upload_bytes / (1024 * 1024);
            return Err(RhError::validacao(format!("Arquivo muito grande. Tamanho máximo: {mb}MB")).into());
        }
        Ok(())
    }

    /// Identifies who is in `image_base64` among the active collaborators
    /// with an enrolled photo and records their next punch of the day.
    pub async fn reconhecer(
        &self,
        dados: &mut Dados,
        image_base64: String,
        captura: Captura,
        agora: DateTime<Utc>,
    ) -> Result<PontoReconhecido> {
        if image_base64.trim().is_empty() {
            bail!(RhError::validacao("Imagem é obrigatória"));
        }
        debug!(tamanho = image_base64.len(), "starting facial recognition");

        let candidatos: Vec<ColaboradorFacial> = dados
            .colaboradores
            .iter()
            .filter(|c| c.tem_facial())
            .filter_map(|c| {
                Some(ColaboradorFacial {
                    id: c.id.clone(),
                    nome_completo: c.nome_completo.clone(),
                    foto_url: c.foto_url.clone()?,
                })
            })
            .collect();
        if candidatos.is_empty() {
            bail!(RhError::validacao(
                "Nenhum colaborador com facial cadastrada encontrado."
            ));
        }
        info!(candidatos = candidatos.len(), "calling face recognition service");

        let req = ReconhecimentoRequest {
            image_base64,
            latitude: captura.latitude.clone(),
            longitude: captura.longitude.clone(),
            dispositivo_info: captura.dispositivo_info.clone(),
            colaboradores: candidatos,
        };
        let reconhecido = self
            .reconhecedor
            .reconhecer(&req)
            .await
            .map_err(RhError::from)?;
        info!(
            colaborador = %reconhecido.colaborador_nome,
            score = ?reconhecido.score,
            "collaborator recognized"
        );

        // The service may answer with an id we never sent.
        if !req.colaboradores.iter().any(|c| c.id == reconhecido.colaborador_id) {
            bail!(
                "serviço de reconhecimento retornou colaborador desconhecido: {}",
                reconhecido.colaborador_id
            );
        }

        let marcacao = ponto::registrar_automatico(
            dados,
            &self.jornada,
            NovaMarcacao {
                colaborador_id: reconhecido.colaborador_id.clone(),
                latitude: captura.latitude,
                longitude: captura.longitude,
                dispositivo_info: captura.dispositivo_info,
                ..Default::default()
            },
            MetodoMarcacao::Facial,
            agora,
        )?;

        Ok(PontoReconhecido {
            colaborador_id: reconhecido.colaborador_id,
            colaborador_nome: reconhecido.colaborador_nome,
            score: reconhecido.score,
            tipo: marcacao.tipo,
            marcacao,
        })
    }

    /// Enrols the reference photo used for recognition and stores its proxy
    /// URL on the collaborator.
    pub async fn cadastrar_facial(&self, dados: &mut Dados, colaborador_id: &str, imagem: &Imagem) -> Result<String> {
        dados.colaborador(colaborador_id)?;
        self.validar_imagem(imagem)?;

        let req = UploadFacialRequest {
            colaborador_id: colaborador_id.to_string(),
            image_base64: imagem.data_url(),
        };
        let caminho = self
            .reconhecedor
            .enviar_facial(&req)
            .await
            .map_err(RhError::from)
            .context("Erro ao fazer upload da facial")?;

        let url = paths::url_proxy(&self.app_url, &caminho);
        colaborador::definir_foto_url(dados, colaborador_id, url.clone())?;
        info!(colaborador = %colaborador_id, %url, "facial photo enrolled");
        Ok(url)
    }

    /// Uploads a new avatar and stores its proxy URL on the collaborator.
    pub async fn enviar_avatar(
        &self,
        dados: &mut Dados,
        colaborador_id: &str,
        imagem: Imagem,
        agora: DateTime<Utc>,
    ) -> Result<String> {
        dados.colaborador(colaborador_id)?;
        self.validar_imagem(&imagem)?;

        let diretorio = paths::caminho_colaborador(colaborador_id);
        self.armazenamento
            .garantir_diretorio(&diretorio)
            .await
            .map_err(RhError::from)
            .with_context(|| format!("Falha ao criar diretório: {diretorio}"))?;

        let arquivo = paths::nome_arquivo(agora.timestamp_millis(), &imagem.nome);
        let caminho = paths::caminho_avatar(colaborador_id, &arquivo);
        self.armazenamento
            .enviar(&caminho, imagem.bytes, &imagem.mime)
            .await
            .map_err(RhError::from)?;

        let url = paths::url_proxy(&self.app_url, &caminho);
        colaborador::definir_avatar_url(dados, colaborador_id, url.clone())?;
        info!(colaborador = %colaborador_id, %caminho, "avatar uploaded");
        Ok(url)
    }

    /// Fetches a stored image, returning its bytes and content type.
    pub async fn baixar_imagem(&self, caminho: &str) -> Result<(Vec<u8>, &'static str)> {
        let caminho = caminho.trim();
        if caminho.is_empty() {
            bail!(RhError::validacao("Path parameter is required"));
        }
        let bytes = self.armazenamento.baixar(caminho).await.map_err(|e| {
            warn!(%caminho, error = %e, "image download failed");
            RhError::from(e)
        })?;
        Ok((bytes, paths::content_type(caminho)))
    }
}
