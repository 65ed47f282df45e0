use std::fmt;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RhError, RhResult};

/// The four punch types of a working day, in the order they are expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoMarcacao {
    Entrada,
    EntradaAlmoco,
    VoltaAlmoco,
    Saida,
}

impl TipoMarcacao {
    /// Label shown to people at the clock and in reports.
    pub fn rotulo(&self) -> &'static str {
        match self {
            TipoMarcacao::Entrada => "Entrada",
            TipoMarcacao::EntradaAlmoco => "Saída almoço",
            TipoMarcacao::VoltaAlmoco => "Retorno almoço",
            TipoMarcacao::Saida => "Saída",
        }
    }
}

impl fmt::Display for TipoMarcacao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TipoMarcacao::Entrada => write!(f, "ENTRADA"),
            TipoMarcacao::EntradaAlmoco => write!(f, "ENTRADA_ALMOCO"),
            TipoMarcacao::VoltaAlmoco => write!(f, "VOLTA_ALMOCO"),
            TipoMarcacao::Saida => write!(f, "SAIDA"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetodoMarcacao {
    Facial,
    Manual,
    Qrcode,
}

impl fmt::Display for MetodoMarcacao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetodoMarcacao::Facial => write!(f, "FACIAL"),
            MetodoMarcacao::Manual => write!(f, "MANUAL"),
            MetodoMarcacao::Qrcode => write!(f, "QRCODE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusMarcacao {
    Pendente,
    Confirmado,
    Rejeitado,
}

impl fmt::Display for StatusMarcacao {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusMarcacao::Pendente => write!(f, "PENDENTE"),
            StatusMarcacao::Confirmado => write!(f, "CONFIRMADO"),
            StatusMarcacao::Rejeitado => write!(f, "REJEITADO"),
        }
    }
}

/// A single time clock punch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarcacaoPonto {
    pub id: String,
    pub colaborador_id: String,
    pub tipo: TipoMarcacao,
    pub data_hora: DateTime<Utc>,
    pub metodo: MetodoMarcacao,
    pub foto_capturada_url: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub dispositivo_info: Option<String>,
    pub status: StatusMarcacao,
    /// Required for manual punches.
    pub justificativa: Option<String>,
    pub aprovado_por: Option<String>,
    pub data_aprovacao: Option<DateTime<Utc>>,
    pub motivo_rejeicao: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a punch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NovaMarcacao {
    pub colaborador_id: String,
    pub tipo: Option<TipoMarcacao>,
    pub metodo: Option<MetodoMarcacao>,
    pub foto_capturada_url: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub dispositivo_info: Option<String>,
    pub justificativa: Option<String>,
}

fn non_blank(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

impl MarcacaoPonto {
    /// Builds a punch of the given type at `data_hora`.
    ///
    /// Manual punches start `PENDENTE` and need a justification; facial and
    /// QR code punches are confirmed on the spot.
    pub fn new(
        input: NovaMarcacao,
        tipo: TipoMarcacao,
        metodo: MetodoMarcacao,
        data_hora: DateTime<Utc>,
    ) -> RhResult<Self> {
        if input.colaborador_id.trim().is_empty() {
            return Err(RhError::validacao("ID do colaborador é obrigatório"));
        }
        let justificativa = non_blank(input.justificativa);
        if metodo == MetodoMarcacao::Manual && justificativa.is_none() {
            return Err(RhError::validacao(
                "Marcação manual exige justificativa",
            ));
        }

        let status = if metodo == MetodoMarcacao::Manual {
            StatusMarcacao::Pendente
        } else {
            StatusMarcacao::Confirmado
        };

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            colaborador_id: input.colaborador_id,
            tipo,
            data_hora,
            metodo,
            foto_capturada_url: non_blank(input.foto_capturada_url),
            latitude: non_blank(input.latitude),
            longitude: non_blank(input.longitude),
            dispositivo_info: non_blank(input.dispositivo_info),
            status,
            justificativa,
            aprovado_por: None,
            data_aprovacao: None,
            motivo_rejeicao: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Confirms a pending punch.
    pub fn aprovar(&mut self, aprovador: Option<String>, quando: DateTime<Utc>) -> RhResult<()> {
        self.exigir_pendente()?;
        self.status = StatusMarcacao::Confirmado;
        self.aprovado_por = aprovador;
        self.data_aprovacao = Some(quando);
        self.updated_at = quando;
        Ok(())
    }

    /// Rejects a pending punch, recording the reason.
    pub fn rejeitar(
        &mut self,
        aprovador: Option<String>,
        motivo: Option<String>,
        quando: DateTime<Utc>,
    ) -> RhResult<()> {
        self.exigir_pendente()?;
        self.status = StatusMarcacao::Rejeitado;
        self.aprovado_por = aprovador;
        self.motivo_rejeicao = non_blank(motivo);
        self.updated_at = quando;
        Ok(())
    }

    fn exigir_pendente(&self) -> RhResult<()> {
        if self.status != StatusMarcacao::Pendente {
            return Err(RhError::TransicaoInvalida(format!(
                "marcação {} está {}, apenas marcações PENDENTE podem ser revisadas",
                self.id, self.status
            )));
        }
        Ok(())
    }
}
