//! Vacation requests and their approval workflow.
//!
//! A request starts `pendente` and is decided exactly once, either
//! `aprovado` or `rejeitado`.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::cadastros::validacao::opcional;
use crate::error::{RhError, RhResult};
use crate::store::Dados;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusFerias {
    #[default]
    Pendente,
    Aprovado,
    Rejeitado,
}

impl fmt::Display for StatusFerias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFerias::Pendente => write!(f, "pendente"),
            StatusFerias::Aprovado => write!(f, "aprovado"),
            StatusFerias::Rejeitado => write!(f, "rejeitado"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Urgencia {
    #[default]
    Baixa,
    Media,
    Alta,
}

impl fmt::Display for Urgencia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Urgencia::Baixa => write!(f, "baixa"),
            Urgencia::Media => write!(f, "media"),
            Urgencia::Alta => write!(f, "alta"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolicitacaoFerias {
    pub id: String,
    pub colaborador_id: String,
    pub data_inicio: NaiveDate,
    pub data_fim: NaiveDate,
    pub total_dias: u32,
    pub observacoes: Option<String>,
    pub status: StatusFerias,
    #[serde(default)]
    pub urgencia: Urgencia,
    pub aprovado_por: Option<String>,
    pub data_aprovacao: Option<DateTime<Utc>>,
    pub motivo_rejeicao: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormFerias {
    pub colaborador_id: String,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    /// Defaults to the calendar days between the two dates, inclusive.
    pub total_dias: Option<u32>,
    pub observacoes: Option<String>,
    pub urgencia: Option<Urgencia>,
}

pub fn criar(dados: &mut Dados, form: FormFerias, agora: DateTime<Utc>) -> RhResult<SolicitacaoFerias> {
    if form.colaborador_id.trim().is_empty() {
        return Err(RhError::validacao("Colaborador é obrigatório"));
    }
    dados.colaborador(&form.colaborador_id)?;

    let data_inicio = form
        .data_inicio
        .ok_or_else(|| RhError::validacao("Data de início é obrigatória"))?;
    let data_fim = form
        .data_fim
        .ok_or_else(|| RhError::validacao("Data de fim é obrigatória"))?;
    if data_fim < data_inicio {
        return Err(RhError::validacao(
            "Data de fim não pode ser anterior à data de início",
        ));
    }

    let corridos = (data_fim - data_inicio).num_days() + 1;
    let total_dias = form.total_dias.unwrap_or(corridos as u32);
    if total_dias < 1 {
        return Err(RhError::validacao("Total de dias deve ser pelo menos 1"));
    }

    let solicitacao = SolicitacaoFerias {
        id: Uuid::new_v4().to_string(),
        colaborador_id: form.colaborador_id,
        data_inicio,
        data_fim,
        total_dias,
        observacoes: opcional(form.observacoes),
        status: StatusFerias::Pendente,
        urgencia: form.urgencia.unwrap_or_default(),
        aprovado_por: None,
        data_aprovacao: None,
        motivo_rejeicao: None,
        created_at: agora,
        updated_at: agora,
    };
    dados.solicitacoes_ferias.push(solicitacao.clone());
    info!(
        solicitacao = %solicitacao.id,
        colaborador = %solicitacao.colaborador_id,
        dias = solicitacao.total_dias,
        "vacation request opened"
    );
    Ok(solicitacao)
}

/// Decides a pending request.
///
/// Approval records who approved and when; rejection records the reason.
/// Already decided requests cannot change again.
pub fn atualizar_status(
    dados: &mut Dados,
    id: &str,
    status: StatusFerias,
    motivo: Option<String>,
    aprovador: Option<String>,
    agora: DateTime<Utc>,
) -> RhResult<SolicitacaoFerias> {
    let s = dados.solicitacao_ferias_mut(id)?;
    if s.status != StatusFerias::Pendente {
        return Err(RhError::TransicaoInvalida(format!(
            "solicitação {id} já está {}",
            s.status
        )));
    }

    match status {
        StatusFerias::Pendente => {
            return Err(RhError::TransicaoInvalida(format!(
                "solicitação {id} já está pendente"
            )));
        }
        StatusFerias::Aprovado => {
            s.aprovado_por = opcional(aprovador);
            s.data_aprovacao = Some(agora);
        }
        StatusFerias::Rejeitado => {
            s.aprovado_por = opcional(aprovador);
            s.motivo_rejeicao = opcional(motivo);
        }
    }
    s.status = status;
    s.updated_at = agora;
    info!(solicitacao = %id, %status, "vacation request decided");
    Ok(s.clone())
}

/// A request joined with its collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct SolicitacaoDetalhe {
    #[serde(flatten)]
    pub solicitacao: SolicitacaoFerias,
    pub colaborador_nome: Option<String>,
    pub departamento_id: Option<String>,
    pub departamento_nome: Option<String>,
}

/// Lists requests newest first, optionally restricted to one status.
pub fn listar(dados: &Dados, status: Option<StatusFerias>) -> Vec<SolicitacaoDetalhe> {
    let mut itens: Vec<&SolicitacaoFerias> = dados
        .solicitacoes_ferias
        .iter()
        .filter(|s| status.is_none_or(|st| s.status == st))
        .collect();
    itens.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    itens
        .into_iter()
        .map(|s| {
            let colaborador = dados.colaborador(&s.colaborador_id).ok();
            let departamento = colaborador.and_then(|c| dados.departamento(&c.departamento_id).ok());
            SolicitacaoDetalhe {
                solicitacao: s.clone(),
                colaborador_nome: colaborador.map(|c| c.nome_completo.clone()),
                departamento_id: colaborador.map(|c| c.departamento_id.clone()),
                departamento_nome: departamento.map(|d| d.nome.clone()),
            }
        })
        .collect()
}
