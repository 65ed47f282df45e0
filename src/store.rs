//! Persistência em um único documento JSON.
//!
//! [`Dados`] guarda todas as tabelas em memória; [`Store`] carrega e salva o
//! documento de forma atômica (arquivo temporário no mesmo diretório seguido de
//! `rename`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cadastros::{Cargo, Colaborador, Departamento, Unidade};
use crate::error::{RhError, RhResult};
use crate::ferias::SolicitacaoFerias;
use crate::ponto::MarcacaoPonto;

/// Todas as tabelas da aplicação.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dados {
    #[serde(default)]
    pub departamentos: Vec<Departamento>,
    #[serde(default)]
    pub cargos: Vec<Cargo>,
    #[serde(default)]
    pub unidades: Vec<Unidade>,
    #[serde(default)]
    pub colaboradores: Vec<Colaborador>,
    #[serde(default)]
    pub solicitacoes_ferias: Vec<SolicitacaoFerias>,
    #[serde(default)]
    pub marcacoes: Vec<MarcacaoPonto>,
}

macro_rules! busca_por_id {
    ($get:ident, $get_mut:ident, $campo:ident, $tipo:ty, $nome:literal) => {
        pub fn $get(&self, id: &str) -> RhResult<&$tipo> {
            self.$campo
                .iter()
                .find(|r| r.id == id)
                .ok_or_else(|| RhError::nao_encontrado($nome, id))
        }

        pub fn $get_mut(&mut self, id: &str) -> RhResult<&mut $tipo> {
            self.$campo
                .iter_mut()
                .find(|r| r.id == id)
                .ok_or_else(|| RhError::nao_encontrado($nome, id))
        }
    };
}

impl Dados {
    busca_por_id!(departamento, departamento_mut, departamentos, Departamento, "Departamento");
    busca_por_id!(cargo, cargo_mut, cargos, Cargo, "Cargo");
    busca_por_id!(unidade, unidade_mut, unidades, Unidade, "Unidade");
    busca_por_id!(colaborador, colaborador_mut, colaboradores, Colaborador, "Colaborador");
    busca_por_id!(
        solicitacao_ferias,
        solicitacao_ferias_mut,
        solicitacoes_ferias,
        SolicitacaoFerias,
        "Solicitação de férias"
    );
    busca_por_id!(marcacao, marcacao_mut, marcacoes, MarcacaoPonto, "Marcação");
}

/// Documento JSON aberto a partir de um caminho.
pub struct Store {
    path: PathBuf,
    pub dados: Dados,
}

impl Store {
    /// Abre o arquivo de dados; um arquivo inexistente começa vazio.
    pub fn abrir(path: impl Into<PathBuf>) -> RhResult<Self> {
        let path = path.into();
        let dados = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                Dados::default()
            } else {
                serde_json::from_str(&contents)?
            }
        } else {
            Dados::default()
        };
        debug!(path = %path.display(), colaboradores = dados.colaboradores.len(), "dados carregados");
        Ok(Self { path, dados })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Grava o documento inteiro de forma atômica.
    pub fn salvar(&self) -> RhResult<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let nome = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| RhError::Config(format!("caminho de dados inválido: {}", self.path.display())))?;
        let tmp = parent.join(format!(".{nome}.tmp.{}", std::process::id()));

        let json = serde_json::to_string_pretty(&self.dados)?;
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "dados salvos");
        Ok(())
    }
}
