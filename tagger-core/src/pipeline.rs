//! # Pipeline de Etiquetagem
//!
//! O [`Tagger`] coordena os três estágios:
//! 1. **Tokenização** (colaborador plugável).
//! 2. **Predição** das tags BIO (colaborador plugável, ex: um modelo treinado).
//! 3. **Decodificação** dos chunks ([`crate::chunk`]).
//!
//! Ambos os colaboradores são injetados na construção; não há estado global.
//! Cada consulta chama o preditor exatamente uma vez e não guarda cache.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::chunk::{self, Chunk, EntityMap};
use crate::error::{Result, Stage, TaggerError};
use crate::predictor::LabelPredictor;
use crate::tagger::TaggedToken;
use crate::tokenizer::{Tokenizer, TokenizerMode};

/// Resultado completo de uma sentença, obtido com uma única predição.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub tagged_tokens: Vec<TaggedToken>,
    pub chunks: Vec<Chunk>,
    pub entities: EntityMap,
}

/// Etiquetador de entidades nomeadas.
///
/// # Modos de Uso
/// - [`Tagger::tag`]: visão plana, um par (token, label) por token.
/// - [`Tagger::get_entities`]: entidades agrupadas por tipo.
/// - [`Tagger::analyze`]: as duas visões e os chunks de uma vez.
///
/// Os colaboradores são `Send + Sync`, então um `Tagger` pode ser
/// compartilhado entre threads atrás de um `Arc`.
pub struct Tagger {
    tokenizer: Box<dyn Tokenizer + Send + Sync>,
    predictor: Box<dyn LabelPredictor + Send + Sync>,
    reject_empty: bool,
}

impl Tagger {
    pub fn new<T, P>(tokenizer: T, predictor: P) -> Self
    where
        T: Tokenizer + Send + Sync + 'static,
        P: LabelPredictor + Send + Sync + 'static,
    {
        Self {
            tokenizer: Box::new(tokenizer),
            predictor: Box::new(predictor),
            reject_empty: false,
        }
    }

    /// Faz sentenças sem nenhum token falharem com [`TaggerError::InvalidInput`].
    ///
    /// Desligado por padrão: uma sentença vazia produz resultado vazio.
    pub fn reject_empty(mut self, reject: bool) -> Self {
        self.reject_empty = reject;
        self
    }

    /// Cria o etiquetador com o tokenizador padrão (espaços em branco).
    pub fn with_predictor<P>(predictor: P) -> Self
    where
        P: LabelPredictor + Send + Sync + 'static,
    {
        Self::new(TokenizerMode::default(), predictor)
    }

    /// Etiqueta cada token da sentença com o tipo da entidade (ou `O`).
    ///
    /// # Exemplo
    /// `"President Obama is speaking"` → `[("President", "O"), ("Obama", "PERSON"), ...]`
    pub fn tag(&self, sentence: &str) -> Result<Vec<TaggedToken>> {
        let (tokens, tags) = self.tokenize_and_predict(sentence)?;
        Ok(tokens
            .into_iter()
            .zip(&tags)
            .map(|(token, tag)| TaggedToken::new(token, tag))
            .collect())
    }

    /// Extrai as entidades da sentença agrupadas por tipo.
    ///
    /// As tags cruas (com prefixo) vão direto para o decodificador, que usa
    /// o `B-`/`I-` para decidir as fronteiras.
    pub fn get_entities(&self, sentence: &str) -> Result<EntityMap> {
        let (tokens, tags) = self.tokenize_and_predict(sentence)?;
        chunk::decode(&tokens, &tags)
    }

    /// Tokens, chunks e entidades a partir de uma única predição.
    pub fn analyze(&self, sentence: &str) -> Result<Analysis> {
        let (tokens, tags) = self.tokenize_and_predict(sentence)?;
        let chunks = chunk::get_chunks(&tags)?;
        let entities = chunk::group_chunks(&tokens, &chunks);
        let tagged_tokens = tokens
            .into_iter()
            .zip(&tags)
            .map(|(token, tag)| TaggedToken::new(token, tag))
            .collect();

        Ok(Analysis {
            tagged_tokens,
            chunks,
            entities,
        })
    }

    /// Divide a sentença com o tokenizador configurado.
    ///
    /// Uma tokenização sem tokens só é erro ([`TaggerError::InvalidInput`])
    /// quando o etiquetador foi criado com [`Tagger::reject_empty`].
    pub fn tokenize(&self, sentence: &str) -> Result<Vec<String>> {
        let tokens = self
            .tokenizer
            .tokenize(sentence)
            .map_err(|e| TaggerError::collaborator(Stage::Tokenize, e))?;
        if tokens.is_empty() && self.reject_empty {
            warn!(chars = sentence.len(), "sentença sem tokens rejeitada");
            return Err(TaggerError::InvalidInput("sentença sem nenhum token".into()));
        }
        Ok(tokens)
    }

    /// Chama o preditor uma vez e garante uma tag por token.
    pub fn predict(&self, tokens: &[String]) -> Result<Vec<String>> {
        let tags = self
            .predictor
            .predict(tokens)
            .map_err(|e| TaggerError::collaborator(Stage::Predict, e))?;
        if tags.len() != tokens.len() {
            return Err(TaggerError::LengthMismatch {
                tokens: tokens.len(),
                tags: tags.len(),
            });
        }
        Ok(tags)
    }

    fn tokenize_and_predict(&self, sentence: &str) -> Result<(Vec<String>, Vec<String>)> {
        let tokens = self.tokenize(sentence)?;
        if tokens.is_empty() {
            return Ok((tokens, Vec::new()));
        }
        let tags = self.predict(&tokens)?;
        debug!(tokens = tokens.len(), "sentença etiquetada");
        Ok((tokens, tags))
    }
}

impl std::fmt::Debug for Tagger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tagger")
            .field("reject_empty", &self.reject_empty)
            .finish_non_exhaustive()
    }
}
