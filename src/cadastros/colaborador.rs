//! Cadastro de colaboradores.
//!
//! Além dos dados pessoais e profissionais, o colaborador guarda as URLs de
//! avatar e da foto facial usada pelo relógio de ponto. Matrícula, CPF e
//! e-mail corporativo são únicos.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::validacao::{contem, digitos, email_valido, obrigatorio, opcional, Dinheiro};
use super::{ordenar, paginar, Direcao, Pagina};
use crate::error::{RhError, RhResult};
use crate::nextcloud::paths;
use crate::store::Dados;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genero {
    Masculino,
    Feminino,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoCivil {
    Solteiro,
    Casado,
    Divorciado,
    Viuvo,
}

/// Unidades federativas.
#[allow(clippy::upper_case_acronyms)]
#[rustfmt::skip]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Uf {
    AC, AL, AP, AM, BA, CE, DF, ES, GO, MA, MT, MS, MG, PA,
    PB, PR, PE, PI, RJ, RN, RS, RO, RR, SC, SP, SE, TO,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoContrato {
    Clt,
    Pj,
    Estagio,
    Contrato,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegimeTrabalho {
    Presencial,
    Hibrido,
    Home,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Banco {
    BancoDoBrasil,
    Caixa,
    Bradesco,
    Itau,
    Santander,
    Sicredi,
    Sicoob,
    Banrisul,
    Nubank,
    Inter,
    Btg,
    C6,
    Original,
    Safra,
    Mercantil,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusColaborador {
    #[default]
    Ativo,
    Inativo,
    Afastado,
    Demitido,
}

impl fmt::Display for StatusColaborador {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusColaborador::Ativo => write!(f, "ativo"),
            StatusColaborador::Inativo => write!(f, "inativo"),
            StatusColaborador::Afastado => write!(f, "afastado"),
            StatusColaborador::Demitido => write!(f, "demitido"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Colaborador {
    pub id: String,
    pub matricula: String,
    pub cpf: String,

    pub nome_completo: String,
    pub nome_social: Option<String>,
    pub data_nascimento: NaiveDate,
    pub genero: Genero,
    pub estado_civil: EstadoCivil,

    pub rg: Option<String>,
    pub orgao_expedidor: Option<String>,
    pub titulo_eleitor: Option<String>,
    pub pis_pasep: Option<String>,
    pub ctps: Option<String>,
    pub serie_ctps: Option<String>,

    pub email_corporativo: String,
    pub email_pessoal: Option<String>,
    pub telefone_celular: String,
    pub telefone_fixo: Option<String>,

    pub cep: String,
    pub logradouro: String,
    pub numero: String,
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    pub estado: Uf,
    pub pais: String,

    pub cargo_id: String,
    pub departamento_id: String,
    pub unidade_id: String,
    pub gestor_id: Option<String>,
    pub data_admissao: NaiveDate,
    pub data_demissao: Option<NaiveDate>,
    pub tipo_contrato: TipoContrato,
    pub regime_trabalho: RegimeTrabalho,
    pub carga_horaria_semanal: u32,

    pub salario_base: Option<Dinheiro>,
    pub nivel_salarial: Option<String>,

    pub banco: Banco,
    pub agencia: String,
    pub conta: String,
    pub tipo_conta: String,
    pub pix: Option<String>,

    /// Foto de referência para o reconhecimento facial (URL do proxy de imagens).
    pub foto_url: Option<String>,
    pub avatar_url: Option<String>,
    pub status: StatusColaborador,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Colaborador {
    pub fn ativo(&self) -> bool {
        self.status == StatusColaborador::Ativo
    }

    /// Colaborador ativo com foto facial cadastrada.
    pub fn tem_facial(&self) -> bool {
        self.ativo() && self.foto_url.as_deref().is_some_and(|u| !u.trim().is_empty())
    }
}

/// Formulário de cadastro e edição de colaborador.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormColaborador {
    pub nome_completo: String,
    pub nome_social: Option<String>,
    pub cpf: String,
    pub data_nascimento: Option<NaiveDate>,
    pub genero: Option<Genero>,
    pub estado_civil: Option<EstadoCivil>,
    pub email_corporativo: String,
    pub email_pessoal: Option<String>,
    pub telefone_celular: String,
    pub telefone_fixo: Option<String>,
    pub cep: String,
    pub logradouro: String,
    pub numero: String,
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    pub estado: Option<Uf>,
    pub matricula: String,
    pub departamento_id: String,
    pub cargo_id: String,
    pub unidade_id: String,
    pub gestor_id: Option<String>,
    pub data_admissao: Option<NaiveDate>,
    pub data_demissao: Option<NaiveDate>,
    pub tipo_contrato: Option<TipoContrato>,
    pub regime_trabalho: Option<RegimeTrabalho>,
    pub carga_horaria_semanal: Option<u32>,
    pub salario_base: String,
    pub nivel_salarial: Option<String>,
    pub banco: Option<Banco>,
    pub agencia: String,
    pub conta: String,
    pub tipo_conta: String,
    pub pix: Option<String>,
    pub rg: Option<String>,
    pub orgao_expedidor: Option<String>,
    pub titulo_eleitor: Option<String>,
    pub pis_pasep: Option<String>,
    pub ctps: Option<String>,
    pub serie_ctps: Option<String>,
    /// Só considerado na edição.
    pub status: Option<StatusColaborador>,
}

fn exigir<T>(valor: Option<T>, mensagem: &str) -> RhResult<T> {
    valor.ok_or_else(|| RhError::validacao(mensagem))
}

fn so_digitos(v: &str) -> String {
    v.chars().filter(char::is_ascii_digit).collect()
}

// Valida o formulário e monta o registro. `base` traz id, timestamps e URLs de
// imagem do registro existente na edição.
fn montar(dados: &Dados, form: FormColaborador, base: Option<&Colaborador>) -> RhResult<Colaborador> {
    let proprio_id = base.map(|b| b.id.as_str());

    let nome_completo = obrigatorio(&form.nome_completo, 2, "Nome é obrigatório")?;
    let cpf = obrigatorio(&form.cpf, 1, "CPF é obrigatório")?;
    if digitos(&cpf) < 11 {
        return Err(RhError::validacao("CPF é obrigatório"));
    }
    let data_nascimento = exigir(form.data_nascimento, "Data de nascimento é obrigatória")?;
    let genero = exigir(form.genero, "Gênero é obrigatório")?;
    let estado_civil = exigir(form.estado_civil, "Estado civil é obrigatório")?;

    let email_corporativo = form.email_corporativo.trim().to_lowercase();
    if !email_valido(&email_corporativo) {
        return Err(RhError::validacao("E-mail corporativo inválido"));
    }
    let email_pessoal = opcional(form.email_pessoal);
    if let Some(e) = &email_pessoal
        && !email_valido(e)
    {
        return Err(RhError::validacao("E-mail pessoal inválido"));
    }

    let telefone_celular = obrigatorio(&form.telefone_celular, 1, "Celular é obrigatório")?;
    if digitos(&telefone_celular) < 10 {
        return Err(RhError::validacao("Celular é obrigatório"));
    }
    let cep = obrigatorio(&form.cep, 1, "CEP é obrigatório")?;
    if digitos(&cep) < 8 {
        return Err(RhError::validacao("CEP é obrigatório"));
    }
    let logradouro = obrigatorio(&form.logradouro, 1, "Logradouro é obrigatório")?;
    let numero = obrigatorio(&form.numero, 1, "Número é obrigatório")?;
    let bairro = obrigatorio(&form.bairro, 1, "Bairro é obrigatório")?;
    let cidade = obrigatorio(&form.cidade, 1, "Cidade é obrigatória")?;
    let estado = exigir(form.estado, "UF é obrigatória")?;

    let matricula = obrigatorio(&form.matricula, 1, "Matrícula é obrigatória")?;
    let departamento_id = obrigatorio(&form.departamento_id, 1, "Departamento é obrigatório")?;
    let cargo_id = obrigatorio(&form.cargo_id, 1, "Cargo é obrigatório")?;
    let unidade_id = obrigatorio(&form.unidade_id, 1, "Unidade é obrigatória")?;
    dados.departamento(&departamento_id)?;
    dados.cargo(&cargo_id)?;
    dados.unidade(&unidade_id)?;

    let gestor_id = opcional(form.gestor_id);
    if let Some(g) = &gestor_id {
        if Some(g.as_str()) == proprio_id {
            return Err(RhError::validacao("Um colaborador não pode ser gestor de si mesmo"));
        }
        dados.colaborador(g)?;
    }

    let data_admissao = exigir(form.data_admissao, "Data de admissão é obrigatória")?;
    if data_admissao < data_nascimento {
        return Err(RhError::validacao(
            "Data de admissão não pode ser anterior à data de nascimento",
        ));
    }
    if let Some(dem) = form.data_demissao
        && dem < data_admissao
    {
        return Err(RhError::validacao(
            "Data de demissão não pode ser anterior à data de admissão",
        ));
    }
    let tipo_contrato = exigir(form.tipo_contrato, "Tipo de contrato é obrigatório")?;
    let regime_trabalho = exigir(form.regime_trabalho, "Regime é obrigatório")?;
    let carga_horaria_semanal = form.carga_horaria_semanal.unwrap_or(40);
    if carga_horaria_semanal == 0 || carga_horaria_semanal > 44 {
        return Err(RhError::validacao("Carga horária semanal deve estar entre 1 e 44 horas"));
    }

    obrigatorio(&form.salario_base, 1, "Salário é obrigatório")?;
    let salario_base = Dinheiro::parse(&form.salario_base);

    let banco = exigir(form.banco, "Banco é obrigatório")?;
    let agencia = obrigatorio(&form.agencia, 1, "Agência é obrigatória")?;
    let conta = obrigatorio(&form.conta, 1, "Conta é obrigatória")?;
    let tipo_conta = obrigatorio(&form.tipo_conta, 1, "Tipo de conta é obrigatório")?;

    checar_unicidade(dados, proprio_id, &matricula, &cpf, &email_corporativo)?;

    let now = Utc::now();
    Ok(Colaborador {
        id: base.map(|b| b.id.clone()).unwrap_or_else(|| Uuid::new_v4().to_string()),
        matricula,
        cpf,
        nome_completo,
        nome_social: opcional(form.nome_social),
        data_nascimento,
        genero,
        estado_civil,
        rg: opcional(form.rg),
        orgao_expedidor: opcional(form.orgao_expedidor),
        titulo_eleitor: opcional(form.titulo_eleitor),
        pis_pasep: opcional(form.pis_pasep),
        ctps: opcional(form.ctps),
        serie_ctps: opcional(form.serie_ctps),
        email_corporativo,
        email_pessoal,
        telefone_celular,
        telefone_fixo: opcional(form.telefone_fixo),
        cep,
        logradouro,
        numero,
        complemento: opcional(form.complemento),
        bairro,
        cidade,
        estado,
        pais: base.map(|b| b.pais.clone()).unwrap_or_else(|| "Brasil".to_string()),
        cargo_id,
        departamento_id,
        unidade_id,
        gestor_id,
        data_admissao,
        data_demissao: form.data_demissao,
        tipo_contrato,
        regime_trabalho,
        carga_horaria_semanal,
        salario_base,
        nivel_salarial: opcional(form.nivel_salarial),
        banco,
        agencia,
        conta,
        tipo_conta,
        pix: opcional(form.pix),
        foto_url: base.and_then(|b| b.foto_url.clone()),
        avatar_url: base.and_then(|b| b.avatar_url.clone()),
        status: match base {
            Some(b) => form.status.unwrap_or(b.status),
            None => StatusColaborador::Ativo,
        },
        created_at: base.map(|b| b.created_at).unwrap_or(now),
        updated_at: now,
    })
}

fn checar_unicidade(
    dados: &Dados,
    proprio_id: Option<&str>,
    matricula: &str,
    cpf: &str,
    email: &str,
) -> RhResult<()> {
    let cpf_digitos = so_digitos(cpf);
    for c in dados.colaboradores.iter().filter(|c| Some(c.id.as_str()) != proprio_id) {
        let (campo, valor) = if c.matricula == matricula {
            ("matrícula", matricula)
        } else if so_digitos(&c.cpf) == cpf_digitos {
            ("CPF", cpf)
        } else if c.email_corporativo.eq_ignore_ascii_case(email) {
            ("e-mail corporativo", email)
        } else {
            continue;
        };
        return Err(RhError::Duplicado {
            entidade: "colaborador",
            campo,
            valor: valor.to_string(),
        });
    }
    Ok(())
}

pub fn criar(dados: &mut Dados, form: FormColaborador) -> RhResult<Colaborador> {
    let colaborador = montar(dados, form, None)?;
    dados.colaboradores.push(colaborador.clone());
    info!(colaborador = %colaborador.id, matricula = %colaborador.matricula, "collaborator created");
    Ok(colaborador)
}

pub fn atualizar(dados: &mut Dados, id: &str, form: FormColaborador) -> RhResult<Colaborador> {
    let atual = dados.colaborador(id)?.clone();
    let editado = montar(dados, form, Some(&atual))?;
    *dados.colaborador_mut(id)? = editado.clone();
    Ok(editado)
}

/// Marca o colaborador como inativo; o histórico de ponto é mantido.
pub fn desativar(dados: &mut Dados, id: &str) -> RhResult<Colaborador> {
    let c = dados.colaborador_mut(id)?;
    c.status = StatusColaborador::Inativo;
    c.updated_at = Utc::now();
    info!(colaborador = %id, "collaborator deactivated");
    Ok(c.clone())
}

pub fn definir_foto_url(dados: &mut Dados, id: &str, url: String) -> RhResult<()> {
    let c = dados.colaborador_mut(id)?;
    c.foto_url = Some(url);
    c.updated_at = Utc::now();
    Ok(())
}

pub fn definir_avatar_url(dados: &mut Dados, id: &str, url: String) -> RhResult<()> {
    let c = dados.colaborador_mut(id)?;
    c.avatar_url = Some(url);
    c.updated_at = Utc::now();
    Ok(())
}

/// Referência resumida a um registro relacionado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Referencia {
    pub id: String,
    pub nome: String,
}

/// Colaborador com os nomes dos registros relacionados.
#[derive(Debug, Clone, Serialize)]
pub struct ColaboradorDetalhe {
    #[serde(flatten)]
    pub colaborador: Colaborador,
    pub cargo: Option<Referencia>,
    pub departamento: Option<Referencia>,
    pub unidade: Option<Referencia>,
    pub gestor: Option<Referencia>,
}

impl ColaboradorDetalhe {
    /// Troca URLs diretas do WebDAV pela rota de proxy de imagens em `app_url`.
    pub fn com_urls_acessiveis(mut self, app_url: &str) -> Self {
        let c = &mut self.colaborador;
        c.foto_url = paths::url_acessivel(app_url, c.foto_url.as_deref());
        c.avatar_url = paths::url_acessivel(app_url, c.avatar_url.as_deref());
        self
    }
}

fn detalhar(dados: &Dados, c: &Colaborador) -> ColaboradorDetalhe {
    ColaboradorDetalhe {
        colaborador: c.clone(),
        cargo: dados.cargo(&c.cargo_id).ok().map(|x| Referencia {
            id: x.id.clone(),
            nome: x.titulo.clone(),
        }),
        departamento: dados.departamento(&c.departamento_id).ok().map(|x| Referencia {
            id: x.id.clone(),
            nome: x.nome.clone(),
        }),
        unidade: dados.unidade(&c.unidade_id).ok().map(|x| Referencia {
            id: x.id.clone(),
            nome: x.nome.clone(),
        }),
        gestor: c
            .gestor_id
            .as_deref()
            .and_then(|g| dados.colaborador(g).ok())
            .map(|x| Referencia {
                id: x.id.clone(),
                nome: x.nome_completo.clone(),
            }),
    }
}

pub fn obter(dados: &Dados, id: &str) -> RhResult<ColaboradorDetalhe> {
    Ok(detalhar(dados, dados.colaborador(id)?))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OrdemColaborador {
    Nome,
    Matricula,
    DataAdmissao,
    #[default]
    Criacao,
}

/// Filtros da listagem de colaboradores.
#[derive(Debug, Clone)]
pub struct FiltroColaboradores {
    /// Busca em nome, matrícula e e-mail corporativo.
    pub busca: String,
    /// `None` lista todos os status.
    pub status: Option<StatusColaborador>,
    pub departamento_id: Option<String>,
    pub cargo_id: Option<String>,
    pub ordem: OrdemColaborador,
    pub direcao: Direcao,
    pub pagina: usize,
    pub limite: usize,
}

impl Default for FiltroColaboradores {
    fn default() -> Self {
        Self {
            busca: String::new(),
            status: None,
            departamento_id: None,
            cargo_id: None,
            ordem: OrdemColaborador::Criacao,
            direcao: Direcao::Desc,
            pagina: 1,
            limite: 10,
        }
    }
}

pub fn listar(dados: &Dados, filtro: &FiltroColaboradores) -> RhResult<Pagina<ColaboradorDetalhe>> {
    let termo = filtro.busca.trim().to_lowercase();
    let mut itens: Vec<&Colaborador> = dados
        .colaboradores
        .iter()
        .filter(|c| {
            termo.is_empty()
                || contem(&c.nome_completo, &termo)
                || contem(&c.matricula, &termo)
                || contem(&c.email_corporativo, &termo)
        })
        .filter(|c| filtro.status.is_none_or(|s| c.status == s))
        .filter(|c| filtro.departamento_id.as_deref().is_none_or(|d| c.departamento_id == d))
        .filter(|c| filtro.cargo_id.as_deref().is_none_or(|id| c.cargo_id == id))
        .collect();

    itens.sort_by(|a, b| {
        let ordem = match filtro.ordem {
            OrdemColaborador::Nome => a
                .nome_completo
                .to_lowercase()
                .cmp(&b.nome_completo.to_lowercase()),
            OrdemColaborador::Matricula => a.matricula.cmp(&b.matricula),
            OrdemColaborador::DataAdmissao => a.data_admissao.cmp(&b.data_admissao),
            OrdemColaborador::Criacao => a.created_at.cmp(&b.created_at),
        };
        ordenar(ordem, filtro.direcao)
    });

    let pagina = paginar(itens, filtro.pagina, filtro.limite)?;
    Ok(Pagina {
        itens: pagina.itens.into_iter().map(|c| detalhar(dados, c)).collect(),
        pagina: pagina.pagina,
        limite: pagina.limite,
        total: pagina.total,
        total_paginas: pagina.total_paginas,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cadastros::cargo::{self, FormCargo};
    use crate::cadastros::departamento::{self, FormDepartamento};
    use crate::cadastros::unidade::{self, FormUnidade};

    /// Dados with one department, role and unit; returns their ids.
    pub(crate) fn base() -> (Dados, String, String, String) {
        let mut dados = Dados::default();
        let d = departamento::criar(
            &mut dados,
            FormDepartamento {
                codigo: "TI".into(),
                nome: "Tecnologia".into(),
                ..Default::default()
            },
        )
        .unwrap();
        let c = cargo::criar(
            &mut dados,
            FormCargo {
                codigo: "DEV".into(),
                titulo: "Desenvolvedor".into(),
                ..Default::default()
            },
        )
        .unwrap();
        let u = unidade::criar(
            &mut dados,
            FormUnidade {
                codigo: "MTZ".into(),
                nome: "Matriz".into(),
                ..Default::default()
            },
        )
        .unwrap();
        (dados, d.id, c.id, u.id)
    }

    pub(crate) fn form(n: u32, dep: &str, cargo: &str, unidade: &str) -> FormColaborador {
        FormColaborador {
            nome_completo: format!("Colaborador {n}"),
            cpf: format!("123.456.789-{n:02}"),
            data_nascimento: NaiveDate::from_ymd_opt(1990, 5, 20),
            genero: Some(Genero::Feminino),
            estado_civil: Some(EstadoCivil::Solteiro),
            email_corporativo: format!("colab{n}@empresa.com.br"),
            telefone_celular: "(11) 98765-4321".into(),
            cep: "01310-100".into(),
            logradouro: "Av. Paulista".into(),
            numero: "1000".into(),
            bairro: "Bela Vista".into(),
            cidade: "São Paulo".into(),
            estado: Some(Uf::SP),
            matricula: format!("M{n:04}"),
            departamento_id: dep.into(),
            cargo_id: cargo.into(),
            unidade_id: unidade.into(),
            data_admissao: NaiveDate::from_ymd_opt(2020, 1, 6),
            tipo_contrato: Some(TipoContrato::Clt),
            regime_trabalho: Some(RegimeTrabalho::Hibrido),
            salario_base: "R$ 6.500,00".into(),
            banco: Some(Banco::Nubank),
            agencia: "0001".into(),
            conta: "12345-6".into(),
            tipo_conta: "Corrente".into(),
            ..Default::default()
        }
    }

    #[test]
    fn criar_sets_defaults() {
        let (mut dados, d, c, u) = base();
        let col = criar(&mut dados, form(1, &d, &c, &u)).unwrap();
        assert_eq!(col.status, StatusColaborador::Ativo);
        assert_eq!(col.carga_horaria_semanal, 40);
        assert_eq!(col.pais, "Brasil");
        assert_eq!(col.salario_base, Some(Dinheiro(650_000)));
        assert!(!col.tem_facial());
    }

    #[test]
    fn criar_validates_required_fields() {
        let (mut dados, d, c, u) = base();

        let mut f = form(1, &d, &c, &u);
        f.cpf = "123".into();
        assert_eq!(criar(&mut dados, f).unwrap_err().to_string(), "CPF é obrigatório");

        let mut f = form(1, &d, &c, &u);
        f.email_corporativo = "nao-e-email".into();
        assert_eq!(
            criar(&mut dados, f).unwrap_err().to_string(),
            "E-mail corporativo inválido"
        );

        let mut f = form(1, &d, &c, &u);
        f.genero = None;
        assert_eq!(criar(&mut dados, f).unwrap_err().to_string(), "Gênero é obrigatório");

        let mut f = form(1, &d, &c, &u);
        f.cargo_id = "inexistente".into();
        assert!(matches!(
            criar(&mut dados, f),
            Err(RhError::NaoEncontrado { entidade: "Cargo", .. })
        ));
    }

    #[test]
    fn uniqueness_of_matricula_cpf_and_email() {
        let (mut dados, d, c, u) = base();
        criar(&mut dados, form(1, &d, &c, &u)).unwrap();

        let mut f = form(2, &d, &c, &u);
        f.cpf = "12345678901".into();
        let err = criar(&mut dados, f).unwrap_err();
        assert!(matches!(err, RhError::Duplicado { campo: "CPF", .. }));

        let mut f = form(2, &d, &c, &u);
        f.email_corporativo = "COLAB1@empresa.com.br".into();
        let err = criar(&mut dados, f).unwrap_err();
        assert!(matches!(err, RhError::Duplicado { campo: "e-mail corporativo", .. }));
    }

    #[test]
    fn detail_exposes_webdav_images_through_proxy() {
        let (mut dados, d, c, u) = base();
        let col = criar(&mut dados, form(1, &d, &c, &u)).unwrap();
        definir_foto_url(
            &mut dados,
            &col.id,
            "http://nc/remote.php/dav/files/Ponto/colaboradores/c1/facial_1.jpg".into(),
        )
        .unwrap();
        definir_avatar_url(
            &mut dados,
            &col.id,
            "http://rh.local/api/nextcloud/image?path=colaboradores%2Fc1%2Favatar_1.png".into(),
        )
        .unwrap();

        let detalhe = obter(&dados, &col.id).unwrap().com_urls_acessiveis("http://rh.local/");
        assert_eq!(
            detalhe.colaborador.foto_url.as_deref(),
            Some("http://rh.local/api/nextcloud/image?path=colaboradores%2Fc1%2Ffacial_1.jpg")
        );
        assert_eq!(
            detalhe.colaborador.avatar_url.as_deref(),
            Some("http://rh.local/api/nextcloud/image?path=colaboradores%2Fc1%2Favatar_1.png")
        );

        // Stored values are untouched.
        assert!(dados.colaborador(&col.id).unwrap().foto_url.as_deref().unwrap().contains("/remote.php/"));

        let sem_imagem = criar(&mut dados, form(2, &d, &c, &u)).unwrap();
        let detalhe = obter(&dados, &sem_imagem.id).unwrap().com_urls_acessiveis("http://rh.local");
        assert_eq!(detalhe.colaborador.foto_url, None);
        assert_eq!(detalhe.colaborador.avatar_url, None);
    }

    #[test]
    fn atualizar_keeps_identity_and_images() {
        let (mut dados, d, c, u) = base();
        let col = criar(&mut dados, form(1, &d, &c, &u)).unwrap();
        definir_foto_url(&mut dados, &col.id, "http://app/img?path=x".into()).unwrap();

        let mut f = form(1, &d, &c, &u);
        f.nome_completo = "Nome Novo".into();
        f.status = Some(StatusColaborador::Afastado);
        let editado = atualizar(&mut dados, &col.id, f).unwrap();

        assert_eq!(editado.id, col.id);
        assert_eq!(editado.created_at, col.created_at);
        assert_eq!(editado.nome_completo, "Nome Novo");
        assert_eq!(editado.status, StatusColaborador::Afastado);
        assert_eq!(editado.foto_url.as_deref(), Some("http://app/img?path=x"));
    }

    #[test]
    fn gestor_cannot_be_self() {
        let (mut dados, d, c, u) = base();
        let col = criar(&mut dados, form(1, &d, &c, &u)).unwrap();
        let mut f = form(1, &d, &c, &u);
        f.gestor_id = Some(col.id.clone());
        assert!(atualizar(&mut dados, &col.id, f).is_err());
    }

    #[test]
    fn listar_filters_orders_and_paginates() {
        let (mut dados, d, c, u) = base();
        for n in 1..=12 {
            criar(&mut dados, form(n, &d, &c, &u)).unwrap();
        }
        let ultimo = dados.colaboradores[11].id.clone();
        desativar(&mut dados, &ultimo).unwrap();

        let filtro = FiltroColaboradores {
            status: Some(StatusColaborador::Ativo),
            ordem: OrdemColaborador::Matricula,
            direcao: Direcao::Asc,
            pagina: 2,
            limite: 5,
            ..Default::default()
        };
        let p = listar(&dados, &filtro).unwrap();
        assert_eq!(p.total, 11);
        assert_eq!(p.total_paginas, 3);
        let matriculas: Vec<_> = p.itens.iter().map(|i| i.colaborador.matricula.as_str()).collect();
        assert_eq!(matriculas, vec!["M0006", "M0007", "M0008", "M0009", "M0010"]);
        assert_eq!(p.itens[0].departamento.as_ref().unwrap().nome, "Tecnologia");
    }

    #[test]
    fn listar_search_is_case_insensitive() {
        let (mut dados, d, c, u) = base();
        criar(&mut dados, form(1, &d, &c, &u)).unwrap();
        criar(&mut dados, form(2, &d, &c, &u)).unwrap();
        let filtro = FiltroColaboradores {
            busca: "COLAB2@".into(),
            ..Default::default()
        };
        let p = listar(&dados, &filtro).unwrap();
        assert_eq!(p.total, 1);
        assert_eq!(p.itens[0].colaborador.matricula, "M0002");
    }

    #[test]
    fn form_deserializes_from_json() {
        let json = r#"{
            "nome_completo": "Ana Souza",
            "genero": "FEMININO",
            "estado": "RJ",
            "banco": "BANCO_DO_BRASIL",
            "tipo_contrato": "ESTAGIO",
            "data_admissao": "2024-02-01"
        }"#;
        let f: FormColaborador = serde_json::from_str(json).unwrap();
        assert_eq!(f.genero, Some(Genero::Feminino));
        assert_eq!(f.estado, Some(Uf::RJ));
        assert_eq!(f.banco, Some(Banco::BancoDoBrasil));
        assert_eq!(f.tipo_contrato, Some(TipoContrato::Estagio));
        assert!(f.cpf.is_empty());
    }
}
