//! # Esquema de Tags BIO
//!
//! Define o esquema de anotação **BIO** (Beginning-Inside-Outside) utilizado
//! para rotular tokens no reconhecimento de entidades nomeadas.
//!
//! ## Esquema BIO
//!
//! - `B-TIPO`: Begin — primeiro token de uma entidade
//! - `I-TIPO`: Inside — tokens subsequentes da mesma entidade
//! - `O`: Outside — não é parte de nenhuma entidade
//!
//! O `TIPO` é livre (ex: `PERSON`, `LOCATION`, `ORG`): o modelo externo decide
//! o vocabulário, este módulo apenas interpreta o prefixo.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaggerError};

/// Label de um token fora de qualquer entidade.
pub const OUTSIDE: &str = "O";

/// Separador entre o prefixo (`B`/`I`) e o tipo da entidade.
pub const SEPARATOR: char = '-';

/// Classe do prefixo de uma tag que pertence a uma entidade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChunkClass {
    Begin,
    Inside,
}

impl ChunkClass {
    pub fn prefix(&self) -> &'static str {
        match self {
            ChunkClass::Begin => "B",
            ChunkClass::Inside => "I",
        }
    }
}

/// Tag BIO aplicada a um token.
///
/// O esquema BIO permite representar entidades de múltiplos tokens.
/// O preditor devolve strings; [`Tag::parse`] as transforma nesta união.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    /// **Begin**: Marca o INÍCIO de uma entidade. Ex: **White** (B-LOCATION) House.
    Begin(String),
    /// **Inside**: Marca a CONTINUAÇÃO de uma entidade. Ex: White **House** (I-LOCATION).
    Inside(String),
    /// **Outside**: O token não faz parte de nenhuma entidade.
    Outside,
}

impl Tag {
    /// Parseia uma tag a partir de string (ex: "B-PERSON" → `Begin("PERSON")`).
    ///
    /// A classe é o trecho antes do primeiro `-` e o tipo é o restante.
    /// Qualquer tag diferente de `"O"` sem essa estrutura é um
    /// [`TaggerError::MalformedTag`]; `position` só entra na mensagem de erro.
    pub fn parse(raw: &str, position: usize) -> Result<Self> {
        if raw == OUTSIDE {
            return Ok(Tag::Outside);
        }
        let malformed = || TaggerError::MalformedTag {
            tag: raw.to_string(),
            position,
        };
        let (class, entity_type) = raw.split_once(SEPARATOR).ok_or_else(malformed)?;
        if entity_type.is_empty() {
            return Err(malformed());
        }
        match class {
            "B" => Ok(Tag::Begin(entity_type.to_string())),
            "I" => Ok(Tag::Inside(entity_type.to_string())),
            _ => Err(malformed()),
        }
    }

    /// Representação textual da tag (ex: "B-PERSON", "I-ORG", "O").
    pub fn label(&self) -> String {
        match self {
            Tag::Begin(t) => format!("{}{}{}", ChunkClass::Begin.prefix(), SEPARATOR, t),
            Tag::Inside(t) => format!("{}{}{}", ChunkClass::Inside.prefix(), SEPARATOR, t),
            Tag::Outside => OUTSIDE.to_string(),
        }
    }

    /// Classe do prefixo, `None` para `O`.
    pub fn class(&self) -> Option<ChunkClass> {
        match self {
            Tag::Begin(_) => Some(ChunkClass::Begin),
            Tag::Inside(_) => Some(ChunkClass::Inside),
            Tag::Outside => None,
        }
    }

    /// Retorna o tipo desta tag (se for B- ou I-).
    pub fn entity_type(&self) -> Option<&str> {
        match self {
            Tag::Begin(t) | Tag::Inside(t) => Some(t),
            Tag::Outside => None,
        }
    }

    /// Verifica se a transição tag_prev → next é válida no esquema BIO
    ///
    /// Regras:
    /// - `I-X` só pode seguir `B-X` ou `I-X` (mesmo tipo)
    /// - `B-X` pode seguir qualquer tag
    /// - `O` pode seguir qualquer tag
    pub fn is_valid_transition(prev: &Tag, next: &Tag) -> bool {
        match next {
            Tag::Inside(t) => match prev {
                Tag::Begin(prev_t) | Tag::Inside(prev_t) => prev_t == t,
                Tag::Outside => false,
            },
            _ => true,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Remove o prefixo `B-`/`I-` de uma tag crua.
///
/// Pega o trecho depois do último `-`, ou a string inteira se não houver
/// separador. Não valida: `"O"` continua `"O"` e aplicar duas vezes não muda
/// o resultado.
pub fn strip_prefix(raw: &str) -> &str {
    raw.rsplit_once(SEPARATOR).map_or(raw, |(_, label)| label)
}

/// Um token com seu label já sem prefixo (visão plana do etiquetador).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub token: String,
    /// Tipo da entidade ou `"O"`.
    pub label: String,
}

impl TaggedToken {
    pub fn new(token: impl Into<String>, raw_tag: &str) -> Self {
        Self {
            token: token.into(),
            label: strip_prefix(raw_tag).to_string(),
        }
    }

    pub fn is_entity(&self) -> bool {
        self.label != OUTSIDE
    }
}
