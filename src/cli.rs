//! Interface de linha de comando do rhponto baseada em clap.
//!
//! Define a struct [`Cli`] com um grupo de subcomandos por área (cadastros,
//! férias, ponto, dashboard e imagens) e as flags globais
//! (--config, --verbose, --json).

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::cadastros::colaborador::{OrdemColaborador, StatusColaborador};
use crate::cadastros::{Direcao, OrdemCadastro};
use crate::ferias::{StatusFerias, Urgencia};
use crate::ponto::{MetodoMarcacao, TipoMarcacao};

/// rhponto: cadastros de RH, férias e relógio de ponto com reconhecimento facial.
#[derive(Debug, Parser)]
#[command(name = "rhponto", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Arquivo de configuração (padrão: ./rhponto.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Habilita logs detalhados.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Imprime os resultados em JSON.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Cadastro de colaboradores.
    Colaborador {
        #[command(subcommand)]
        acao: AcaoColaborador,
    },

    /// Cadastro de departamentos.
    Departamento {
        #[command(subcommand)]
        acao: AcaoDepartamento,
    },

    /// Cadastro de cargos.
    Cargo {
        #[command(subcommand)]
        acao: AcaoCadastro,
    },

    /// Cadastro de unidades.
    Unidade {
        #[command(subcommand)]
        acao: AcaoCadastro,
    },

    /// Solicitações de férias.
    Ferias {
        #[command(subcommand)]
        acao: AcaoFerias,
    },

    /// Marcações de ponto.
    Ponto {
        #[command(subcommand)]
        acao: AcaoPonto,
    },

    /// Indicadores do painel.
    Dashboard {
        #[command(subcommand)]
        acao: AcaoDashboard,
    },

    /// Baixa uma imagem do armazenamento de arquivos.
    Imagem {
        /// Caminho no armazenamento (ex.: colaboradores/<id>/avatar_1.png).
        path: String,

        /// Arquivo de destino.
        #[arg(long)]
        saida: PathBuf,
    },
}

/// Parâmetros comuns de listagem de departamentos, cargos e unidades.
#[derive(Debug, Clone, Args)]
pub struct ConsultaArgs {
    /// Termo de busca.
    #[arg(long, default_value = "")]
    pub busca: String,

    /// Lista só ativos (true) ou só inativos (false).
    #[arg(long)]
    pub ativo: Option<bool>,

    #[arg(long, value_enum, default_value_t = OrdemCadastro::Criacao)]
    pub ordem: OrdemCadastro,

    #[arg(long, value_enum, default_value_t = Direcao::Desc)]
    pub direcao: Direcao,

    #[arg(long, default_value_t = 1)]
    pub pagina: usize,

    #[arg(long, default_value_t = 10)]
    pub limite: usize,
}

/// Operações de cadastro de cargos e unidades. Formulários são lidos de
/// arquivos JSON ou TOML.
#[derive(Debug, Subcommand)]
pub enum AcaoCadastro {
    Criar {
        #[arg(long)]
        arquivo: PathBuf,
    },
    Atualizar {
        id: String,
        #[arg(long)]
        arquivo: PathBuf,
    },
    Desativar {
        id: String,
    },
    Obter {
        id: String,
    },
    Listar(ConsultaArgs),
}

#[derive(Debug, Subcommand)]
pub enum AcaoDepartamento {
    Criar {
        #[arg(long)]
        arquivo: PathBuf,
    },
    Atualizar {
        id: String,
        #[arg(long)]
        arquivo: PathBuf,
    },
    Desativar {
        id: String,
    },
    Obter {
        id: String,
    },
    Listar {
        #[command(flatten)]
        consulta: ConsultaArgs,

        /// Só filhos deste departamento.
        #[arg(long)]
        pai: Option<String>,
    },
}

/// Filtro de status de colaborador; `todos` não filtra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FiltroStatus {
    Todos,
    Ativo,
    Inativo,
    Afastado,
    Demitido,
}

impl FiltroStatus {
    pub fn status(self) -> Option<StatusColaborador> {
        match self {
            FiltroStatus::Todos => None,
            FiltroStatus::Ativo => Some(StatusColaborador::Ativo),
            FiltroStatus::Inativo => Some(StatusColaborador::Inativo),
            FiltroStatus::Afastado => Some(StatusColaborador::Afastado),
            FiltroStatus::Demitido => Some(StatusColaborador::Demitido),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum AcaoColaborador {
    Criar {
        #[arg(long)]
        arquivo: PathBuf,
    },
    Atualizar {
        id: String,
        #[arg(long)]
        arquivo: PathBuf,
    },
    /// Marca o colaborador como inativo.
    Desativar {
        id: String,
    },
    Obter {
        id: String,
    },
    Listar {
        /// Busca em nome, matrícula e e-mail corporativo.
        #[arg(long, default_value = "")]
        busca: String,

        #[arg(long, value_enum, default_value_t = FiltroStatus::Todos)]
        status: FiltroStatus,

        #[arg(long)]
        departamento: Option<String>,

        #[arg(long)]
        cargo: Option<String>,

        #[arg(long, value_enum, default_value_t = OrdemColaborador::Criacao)]
        ordem: OrdemColaborador,

        #[arg(long, value_enum, default_value_t = Direcao::Desc)]
        direcao: Direcao,

        #[arg(long, default_value_t = 1)]
        pagina: usize,

        #[arg(long, default_value_t = 10)]
        limite: usize,
    },
    /// Cadastra a foto de referência do reconhecimento facial.
    Facial {
        id: String,
        imagem: PathBuf,
    },
    /// Envia uma nova foto de perfil.
    Avatar {
        id: String,
        imagem: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
pub enum AcaoFerias {
    /// Abre uma solicitação de férias.
    Solicitar {
        #[arg(long)]
        colaborador: String,

        /// Primeiro dia (AAAA-MM-DD).
        #[arg(long)]
        inicio: NaiveDate,

        /// Último dia (AAAA-MM-DD).
        #[arg(long)]
        fim: NaiveDate,

        /// Total de dias; padrão é o número de dias corridos.
        #[arg(long)]
        dias: Option<u32>,

        #[arg(long, value_enum, default_value_t = Urgencia::Baixa)]
        urgencia: Urgencia,

        #[arg(long)]
        observacoes: Option<String>,
    },
    Aprovar {
        id: String,
        #[arg(long)]
        aprovador: Option<String>,
    },
    Rejeitar {
        id: String,
        #[arg(long)]
        motivo: Option<String>,
        #[arg(long)]
        aprovador: Option<String>,
    },
    Obter {
        id: String,
    },
    Listar {
        #[arg(long, value_enum)]
        status: Option<StatusFerias>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AcaoPonto {
    /// Registra uma marcação. Sem --tipo, o tipo segue a sequência do dia.
    Registrar {
        #[arg(long)]
        colaborador: String,

        #[arg(long, value_enum)]
        tipo: Option<TipoMarcacao>,

        #[arg(long, value_enum, default_value_t = MetodoMarcacao::Manual)]
        metodo: MetodoMarcacao,

        /// Obrigatória para marcações manuais.
        #[arg(long)]
        justificativa: Option<String>,

        /// Horário da marcação (RFC 3339); padrão é agora.
        #[arg(long)]
        quando: Option<DateTime<Utc>>,

        #[arg(long)]
        dispositivo: Option<String>,
    },
    /// Reconhece o colaborador em uma foto e registra a próxima marcação.
    Reconhecer {
        imagem: PathBuf,
        #[arg(long)]
        latitude: Option<String>,
        #[arg(long)]
        longitude: Option<String>,
        #[arg(long)]
        dispositivo: Option<String>,
    },
    /// Marcações de hoje.
    Hoje {
        #[arg(long)]
        colaborador: String,
    },
    /// Marcações e resumo de um dia.
    Dia {
        #[arg(long)]
        colaborador: String,
        #[arg(long)]
        data: NaiveDate,
    },
    /// Espelho de ponto do mês que contém a data de referência.
    Mes {
        #[arg(long)]
        colaborador: String,
        /// Padrão: hoje.
        #[arg(long)]
        referencia: Option<NaiveDate>,
    },
    Obter {
        id: String,
    },
    /// Marcações aguardando aprovação.
    Pendentes,
    Aprovar {
        id: String,
        #[arg(long)]
        aprovador: Option<String>,
    },
    Rejeitar {
        id: String,
        #[arg(long)]
        motivo: Option<String>,
        #[arg(long)]
        aprovador: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AcaoDashboard {
    Metricas {
        #[arg(long, default_value_t = 30)]
        dias: i64,
    },
    Presenca {
        #[arg(long, default_value_t = 7)]
        dias: i64,
    },
    Headcount,
    Acoes {
        #[arg(long, default_value_t = 5)]
        limite: usize,
    },
}
