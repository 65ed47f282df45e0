//! Punch registration, review and queries over the store.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

use super::marcacao::{MarcacaoPonto, MetodoMarcacao, NovaMarcacao, StatusMarcacao};
use super::resumo::{Jornada, ResumoDia, ResumoMensal};
use super::tipo::MaquinaPonto;
use crate::error::{RhError, RhResult};
use crate::store::Dados;

/// Records a punch whose type and method are given explicitly.
pub fn registrar_ponto(dados: &mut Dados, input: NovaMarcacao, data_hora: DateTime<Utc>) -> RhResult<MarcacaoPonto> {
    let tipo = input
        .tipo
        .ok_or_else(|| RhError::validacao("Tipo de marcação é obrigatório"))?;
    let metodo = input
        .metodo
        .ok_or_else(|| RhError::validacao("Método de marcação é obrigatório"))?;
    dados.colaborador(&input.colaborador_id)?;

    let marcacao = MarcacaoPonto::new(input, tipo, metodo, data_hora)?;
    info!(
        colaborador = %marcacao.colaborador_id,
        tipo = %marcacao.tipo,
        metodo = %marcacao.metodo,
        status = %marcacao.status,
        "punch recorded"
    );
    dados.marcacoes.push(marcacao.clone());
    Ok(marcacao)
}

/// Records a punch at `agora`, deriving its type from the punches already
/// recorded on the same local day. A type given in `input` is ignored.
pub fn registrar_automatico(
    dados: &mut Dados,
    jornada: &Jornada,
    mut input: NovaMarcacao,
    metodo: MetodoMarcacao,
    agora: DateTime<Utc>,
) -> RhResult<MarcacaoPonto> {
    let hoje = marcacoes_hoje(dados, jornada, &input.colaborador_id, agora);
    input.tipo = Some(MaquinaPonto::proximo(&hoje));
    input.metodo = Some(metodo);
    registrar_ponto(dados, input, agora)
}

fn marcacoes_entre(
    dados: &Dados,
    colaborador_id: &str,
    (de, ate): (DateTime<Utc>, DateTime<Utc>),
) -> Vec<MarcacaoPonto> {
    let mut marcacoes: Vec<MarcacaoPonto> = dados
        .marcacoes
        .iter()
        .filter(|m| m.colaborador_id == colaborador_id && m.data_hora >= de && m.data_hora < ate)
        .cloned()
        .collect();
    marcacoes.sort_by_key(|m| m.data_hora);
    marcacoes
}

pub fn marcacoes_do_dia(dados: &Dados, jornada: &Jornada, colaborador_id: &str, dia: NaiveDate) -> Vec<MarcacaoPonto> {
    marcacoes_entre(dados, colaborador_id, jornada.janela_dia(dia))
}

pub fn marcacoes_hoje(dados: &Dados, jornada: &Jornada, colaborador_id: &str, agora: DateTime<Utc>) -> Vec<MarcacaoPonto> {
    marcacoes_do_dia(dados, jornada, colaborador_id, jornada.data_local(agora))
}

/// Punches in the local month containing `referencia`.
pub fn marcacoes_do_mes(
    dados: &Dados,
    jornada: &Jornada,
    colaborador_id: &str,
    referencia: NaiveDate,
) -> Vec<MarcacaoPonto> {
    marcacoes_entre(dados, colaborador_id, jornada.janela_mes(referencia))
}

pub fn aprovar_marcacao(
    dados: &mut Dados,
    id: &str,
    aprovador: Option<String>,
    agora: DateTime<Utc>,
) -> RhResult<MarcacaoPonto> {
    let m = dados.marcacao_mut(id)?;
    m.aprovar(aprovador, agora)?;
    info!(marcacao = %id, "punch approved");
    Ok(m.clone())
}

pub fn rejeitar_marcacao(
    dados: &mut Dados,
    id: &str,
    aprovador: Option<String>,
    motivo: Option<String>,
    agora: DateTime<Utc>,
) -> RhResult<MarcacaoPonto> {
    let m = dados.marcacao_mut(id)?;
    m.rejeitar(aprovador, motivo, agora)?;
    info!(marcacao = %id, "punch rejected");
    Ok(m.clone())
}

/// Punches awaiting review, oldest first.
pub fn marcacoes_pendentes(dados: &Dados) -> Vec<MarcacaoPonto> {
    let mut pendentes: Vec<MarcacaoPonto> = dados
        .marcacoes
        .iter()
        .filter(|m| m.status == StatusMarcacao::Pendente)
        .cloned()
        .collect();
    pendentes.sort_by_key(|m| m.data_hora);
    pendentes
}

pub fn resumo_dia(dados: &Dados, jornada: &Jornada, colaborador_id: &str, dia: NaiveDate) -> RhResult<ResumoDia> {
    dados.colaborador(colaborador_id)?;
    Ok(ResumoDia::calcular(&marcacoes_do_dia(dados, jornada, colaborador_id, dia), jornada))
}

pub fn resumo_mensal(
    dados: &Dados,
    jornada: &Jornada,
    colaborador_id: &str,
    referencia: NaiveDate,
) -> RhResult<ResumoMensal> {
    dados.colaborador(colaborador_id)?;
    Ok(ResumoMensal::calcular(
        &marcacoes_do_mes(dados, jornada, colaborador_id, referencia),
        jornada,
    ))
}
