//! # tagger-core — Etiquetagem BIO e Extração de Entidades
//!
//! Este crate transforma a saída "token a token" de um modelo de reconhecimento
//! de entidades nomeadas em entidades estruturadas.
//!
//! ## Arquitetura do Sistema
//!
//! O dado flui em linha reta:
//!
//! 1.  **Entrada**: Texto bruto (`&str`).
//! 2.  **Tokenização** ([`tokenizer`]): O texto é dividido em tokens por um tokenizador plugável.
//! 3.  **Predição** ([`predictor`]): Um colaborador externo (modelo treinado, léxico...) devolve uma tag BIO por token.
//! 4.  **Decodificação** ([`chunk`]): As tags `B-`/`I-`/`O` viram chunks contíguos.
//! 5.  **Saída**: Pares (token, label) ou entidades agrupadas por tipo.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use tagger_core::Tagger;
//!
//! // Qualquer `Fn(&[String]) -> Vec<String>` serve como preditor
//! let predictor = |tokens: &[String]| {
//!     tokens
//!         .iter()
//!         .map(|t| match t.as_str() {
//!             "Obama" => "B-PERSON",
//!             "White" => "B-LOCATION",
//!             "House" => "I-LOCATION",
//!             _ => "O",
//!         }.to_string())
//!         .collect::<Vec<_>>()
//! };
//! let tagger = Tagger::with_predictor(predictor);
//!
//! let entities = tagger.get_entities("President Obama is speaking at the White House").unwrap();
//! assert_eq!(entities["PERSON"], ["Obama"]);
//! assert_eq!(entities["LOCATION"], ["White House"]);
//!
//! let tagged = tagger.tag("President Obama").unwrap();
//! assert_eq!(tagged[1].label, "PERSON");
//! ```
//!
//! ## Módulos Principais
//!
//! - [`pipeline`]: O etiquetador que conecta os estágios.
//! - [`chunk`]: Decodificador de chunks BIO.
//! - [`tagger`]: Esquema de tags BIO.
//! - [`config`]: Montagem do etiquetador a partir de JSON.

pub mod chunk;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod predictor;
pub mod tagger;
pub mod tokenizer;

pub use chunk::{decode, get_chunks, Chunk, EntityMap};
pub use config::TaggerConfig;
pub use error::{BoxError, Result, Stage, TaggerError};
pub use pipeline::{Analysis, Tagger};
pub use predictor::{LabelPredictor, Lexicon, LexiconPredictor};
pub use tagger::{strip_prefix, Tag, TaggedToken};
pub use tokenizer::{RegexTokenizer, Tokenizer, TokenizerMode};
