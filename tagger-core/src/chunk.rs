//! # Decodificação de Chunks BIO
//!
//! Converte a sequência de tags BIO (uma por token) em entidades contíguas.
//!
//! ## Algoritmo
//! Uma única varredura da esquerda para a direita mantendo o chunk aberto
//! `(tipo, início)`:
//! 1. `O` fecha o chunk aberto (se houver).
//! 2. `B-X` sempre fecha o chunk aberto e abre um novo do tipo `X`, mesmo que
//!    o tipo seja igual: duas entidades vizinhas continuam separadas.
//! 3. `I-X` continua o chunk aberto se ele for do tipo `X`; caso contrário é
//!    tratado exatamente como `B-X`.
//! 4. No fim da sequência o chunk ainda aberto é fechado em `len(tags)`.
//!
//! Os intervalos são semiabertos `[start, end)`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, TaggerError};
use crate::tagger::{ChunkClass, Tag};

/// Separador usado para juntar os tokens de um chunk.
pub const ENTITY_DELIMITER: &str = " ";

/// Entidades agrupadas por tipo, na ordem em que os spans foram fechados.
///
/// Os tipos aparecem na ordem do primeiro span encontrado.
pub type EntityMap = IndexMap<String, Vec<String>>;

/// Um chunk decodificado: tipo da entidade e intervalo de tokens `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub entity_type: String,
    /// Índice do token inicial (inclusivo)
    pub start: usize,
    /// Índice do token final (exclusivo)
    pub end: usize,
}

impl Chunk {
    /// Número de tokens do chunk; zero se `end <= start`.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Texto do chunk: os tokens do intervalo separados por um espaço.
    ///
    /// Panics se o intervalo estiver fora de `tokens`; [`decode`] garante os limites.
    pub fn text<S: AsRef<str>>(&self, tokens: &[S]) -> String {
        tokens[self.start..self.end]
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(ENTITY_DELIMITER)
    }
}

/// Extrai os chunks de uma sequência de tags BIO.
///
/// # Exemplo
/// `[O, B-PER, I-PER, O, B-LOC]` → `[(PER, 1, 3), (LOC, 4, 5)]`
///
/// # Erros
/// [`TaggerError::MalformedTag`] na primeira tag que não seja `O`, `B-X` ou
/// `I-X`. Nenhum chunk é devolvido nesse caso.
pub fn get_chunks<S: AsRef<str>>(tags: &[S]) -> Result<Vec<Chunk>> {
    let mut chunks = Vec::new();
    let mut open: Option<(String, usize)> = None;
    let mut prev = Tag::Outside;

    for (i, raw) in tags.iter().enumerate() {
        let tag = Tag::parse(raw.as_ref(), i)?;

        match &tag {
            Tag::Outside => {
                if let Some((entity_type, start)) = open.take() {
                    chunks.push(Chunk { entity_type, start, end: i });
                }
            }
            Tag::Begin(entity_type) | Tag::Inside(entity_type) => {
                let continues = matches!(
                    &open,
                    Some((open_type, _)) if open_type == entity_type && tag.class() == Some(ChunkClass::Inside)
                );
                if !continues {
                    if !Tag::is_valid_transition(&prev, &tag) {
                        debug!(position = i, prev = %prev, tag = %tag, "transição BIO inválida, abrindo novo chunk");
                    }
                    if let Some((open_type, start)) = open.take() {
                        chunks.push(Chunk { entity_type: open_type, start, end: i });
                    }
                    open = Some((entity_type.clone(), i));
                }
            }
        }
        prev = tag;
    }

    // Fecha o último chunk se ainda estiver aberto
    if let Some((entity_type, start)) = open {
        chunks.push(Chunk { entity_type, start, end: tags.len() });
    }

    Ok(chunks)
}

/// Decodifica `(tokens, tags)` em entidades agrupadas por tipo.
///
/// # Erros
/// - [`TaggerError::LengthMismatch`] se `tokens` e `tags` tiverem tamanhos diferentes.
/// - [`TaggerError::MalformedTag`] se alguma tag não seguir o esquema BIO.
pub fn decode<T: AsRef<str>, S: AsRef<str>>(tokens: &[T], tags: &[S]) -> Result<EntityMap> {
    if tokens.len() != tags.len() {
        return Err(TaggerError::LengthMismatch {
            tokens: tokens.len(),
            tags: tags.len(),
        });
    }

    Ok(group_chunks(tokens, &get_chunks(tags)?))
}

/// Agrupa os chunks por tipo, materializando o texto de cada um na ordem recebida.
pub(crate) fn group_chunks<T: AsRef<str>>(tokens: &[T], chunks: &[Chunk]) -> EntityMap {
    let mut entities = EntityMap::new();
    for chunk in chunks {
        entities
            .entry(chunk.entity_type.clone())
            .or_default()
            .push(chunk.text(tokens));
    }
    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::indexmap;

    fn entities(pairs: &[(&str, &[&str])]) -> EntityMap {
        pairs
            .iter()
            .map(|(t, spans)| (t.to_string(), spans.iter().map(|s| s.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_worked_example() {
        let words = ["President", "Obama", "is", "speaking", "at", "the", "White", "House", "."];
        let tags = ["O", "B-PERSON", "O", "O", "O", "O", "B-LOCATION", "I-LOCATION", "O"];
        let result = decode(&words, &tags).unwrap();
        assert_eq!(
            result,
            indexmap! {
                "PERSON".to_string() => vec!["Obama".to_string()],
                "LOCATION".to_string() => vec!["White House".to_string()],
            }
        );
    }

    #[test]
    fn test_get_chunks_boundaries() {
        let tags = ["O", "B-PER", "I-PER", "O", "B-LOC"];
        let chunks = get_chunks(&tags).unwrap();
        assert_eq!(
            chunks,
            vec![
                Chunk { entity_type: "PER".into(), start: 1, end: 3 },
                Chunk { entity_type: "LOC".into(), start: 4, end: 5 },
            ]
        );
        assert_eq!(chunks[0].len(), 2);
    }

    #[test]
    fn test_trailing_open_chunk_is_closed() {
        let result = decode(&["Hi", "Bob"], &["O", "B-PERSON"]).unwrap();
        assert_eq!(result, entities(&[("PERSON", &["Bob"])]));

        let chunks = get_chunks(&["B-X", "I-X", "I-X"]).unwrap();
        assert_eq!(chunks, vec![Chunk { entity_type: "X".into(), start: 0, end: 3 }]);
    }

    #[test]
    fn test_same_type_begin_splits() {
        let result = decode(&["Bob", "Sue"], &["B-PERSON", "B-PERSON"]).unwrap();
        assert_eq!(result, entities(&[("PERSON", &["Bob", "Sue"])]));
    }

    #[test]
    fn test_inside_with_new_type_starts_chunk() {
        let result = decode(&["Bob", "Paris"], &["B-PERSON", "I-LOCATION"]).unwrap();
        assert_eq!(result, entities(&[("PERSON", &["Bob"]), ("LOCATION", &["Paris"])]));
    }

    #[test]
    fn test_leading_inside_opens_chunk() {
        let result = decode(&["New", "York", "rocks"], &["I-LOC", "I-LOC", "O"]).unwrap();
        assert_eq!(result, entities(&[("LOC", &["New York"])]));
    }

    #[test]
    fn test_spans_of_same_type_in_scan_order() {
        let tokens = ["Ann", "met", "Bob", "and", "Carl", "Lee"];
        let tags = ["B-PER", "O", "B-PER", "O", "B-PER", "I-PER"];
        let result = decode(&tokens, &tags).unwrap();
        assert_eq!(result, entities(&[("PER", &["Ann", "Bob", "Carl Lee"])]));
    }

    #[test]
    fn test_types_keep_first_seen_order() {
        let tokens = ["Paris", "Bob", "Rome"];
        let tags = ["B-LOC", "B-PER", "B-LOC"];
        let result = decode(&tokens, &tags).unwrap();
        let keys: Vec<&str> = result.keys().map(String::as_str).collect();
        assert_eq!(keys, ["LOC", "PER"]);
        assert_eq!(result["LOC"], ["Paris", "Rome"]);
    }

    #[test]
    fn test_every_index_accounted_once() {
        let tags = ["B-A", "I-A", "I-B", "O", "B-B", "B-B", "I-A", "O", "I-C"];
        let chunks = get_chunks(&tags).unwrap();

        let mut covered = vec![0usize; tags.len()];
        for chunk in &chunks {
            assert!(!chunk.is_empty());
            assert!(chunk.end <= tags.len());
            for i in chunk.start..chunk.end {
                covered[i] += 1;
            }
        }
        for (i, tag) in tags.iter().enumerate() {
            let expected = if *tag == "O" { 0 } else { 1 };
            assert_eq!(covered[i], expected, "índice {i}");
        }
        assert_eq!(chunks.len(), 6);
    }

    #[test]
    fn test_all_outside_and_empty() {
        assert!(decode(&["a", "b"], &["O", "O"]).unwrap().is_empty());
        let empty: [&str; 0] = [];
        assert!(decode(&empty, &empty).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_tag_aborts() {
        let err = decode(&["Bob", "Sue"], &["B-PERSON", "PERSON"]).unwrap_err();
        match err {
            TaggerError::MalformedTag { tag, position } => {
                assert_eq!(tag, "PERSON");
                assert_eq!(position, 1);
            }
            other => panic!("esperava MalformedTag, veio {other:?}"),
        }
    }

    #[test]
    fn test_length_mismatch() {
        let err = decode(&["a", "b"], &["O"]).unwrap_err();
        assert!(matches!(err, TaggerError::LengthMismatch { tokens: 2, tags: 1 }));
    }

    #[test]
    fn test_inverted_chunk_has_zero_len() {
        let chunk = Chunk { entity_type: "X".into(), start: 2, end: 1 };
        assert_eq!(chunk.len(), 0);
        assert!(chunk.is_empty());
    }

    #[test]
    fn test_group_chunks_joins_with_delimiter() {
        let tokens = ["Carl", "Lee", "and", "Ann"];
        let chunks = get_chunks(&["B-PER", "I-PER", "O", "B-PER"]).unwrap();
        let grouped = group_chunks(&tokens, &chunks);
        assert_eq!(grouped["PER"], ["Carl Lee", "Ann"]);
        assert_eq!(grouped, decode(&tokens, &["B-PER", "I-PER", "O", "B-PER"]).unwrap());
    }

    #[test]
    fn test_accepts_owned_strings() {
        let tokens: Vec<String> = vec!["Rio".into(), "de".into(), "Janeiro".into()];
        let tags: Vec<String> = vec!["B-LOC".into(), "I-LOC".into(), "I-LOC".into()];
        let result = decode(&tokens, &tags).unwrap();
        assert_eq!(result["LOC"], ["Rio de Janeiro"]);
    }
}
