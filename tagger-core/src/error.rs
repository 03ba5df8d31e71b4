//! # Erros do Etiquetador
//!
//! Todos os erros do crate passam por [`TaggerError`]. Nenhum estágio tenta
//! recuperar parcialmente: uma tag malformada aborta a sentença inteira, porque
//! descartar um token produziria spans com fronteiras erradas.

use std::fmt;

use thiserror::Error;

/// Erro genérico devolvido pelos colaboradores plugáveis (tokenizador e preditor).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Atalho para `Result<T, TaggerError>`.
pub type Result<T> = std::result::Result<T, TaggerError>;

/// Estágio do pipeline em que um colaborador externo falhou.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Divisão do texto em tokens.
    Tokenize,
    /// Predição das tags BIO pelo modelo.
    Predict,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Tokenize => write!(f, "tokenização"),
            Stage::Predict => write!(f, "predição"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TaggerError {
    /// A sentença não é utilizável (vazia, só espaços, ou sem nenhum token).
    #[error("entrada inválida: {0}")]
    InvalidInput(String),

    /// Quantidade de tokens e de tags difere ao entrar no decodificador.
    #[error("quantidade de tokens ({tokens}) difere da quantidade de tags ({tags})")]
    LengthMismatch { tokens: usize, tags: usize },

    /// Tag diferente de "O" sem a estrutura `B-TIPO` / `I-TIPO`.
    #[error("tag malformada {tag:?} na posição {position}")]
    MalformedTag { tag: String, position: usize },

    /// Falha repassada de um colaborador, anotada apenas com o estágio.
    #[error("falha no estágio de {stage}: {source}")]
    Collaborator {
        stage: Stage,
        #[source]
        source: BoxError,
    },

    #[error("léxico inválido: {0}")]
    InvalidLexicon(String),

    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("erro de JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expressão regular inválida: {0}")]
    Regex(#[from] regex::Error),
}

impl TaggerError {
    pub(crate) fn collaborator(stage: Stage, source: BoxError) -> Self {
        TaggerError::Collaborator { stage, source }
    }

    /// Estágio do colaborador que falhou, se o erro veio de um.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            TaggerError::Collaborator { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}
