//! Query evaluation.
//!
//! Evaluates a [`CompiledQuery`] against an [`IndexView`], producing a score
//! for every matching document.
//!
//! Scoring:
//! - term: `tf * idf` where `idf = ln(N / (df + 1)) + 1` (`tf_idf`), or `tf` (`frequency`)
//! - phrase: number of span matches times the summed term weights
//! - boolean: sum of the matching operands' scores
//! - boost: multiplies

use std::collections::BTreeMap;

use brs_config::ScoringModel;
use brs_query::FieldIndex;
use regex::Regex;
use tracing::debug;

use crate::{CompiledQuery, IndexError, view::IndexView};

/// Matching documents and their scores.
pub type Matches = BTreeMap<u32, f32>;

/// Evaluates compiled queries against an index view.
pub struct Evaluator<'a, V: ?Sized> {
    /// Index being searched.
    view: &'a V,
    /// Scoring model.
    scoring: ScoringModel,
    /// Live document count used for idf.
    num_docs: u32,
}

impl<'a, V: IndexView + ?Sized> Evaluator<'a, V> {
    /// Creates an evaluator.
    pub fn new(view: &'a V, scoring: ScoringModel) -> Self {
        Self {
            view,
            scoring,
            num_docs: view.num_docs(),
        }
    }

    /// Returns every matching document with its score.
    pub fn evaluate(&self, query: &CompiledQuery) -> Result<Matches, IndexError> {
        match query {
            CompiledQuery::Null => Ok(Matches::new()),
            CompiledQuery::Term { field, term } => self.term(*field, term),
            CompiledQuery::Phrase {
                field,
                terms,
                slop,
                ordered,
            } => self.phrase(*field, terms, *slop, *ordered),
            CompiledQuery::Prefix { field, prefix } => {
                let terms = self.view.terms_with_prefix(*field, prefix)?;
                self.any_term(*field, &terms)
            }
            CompiledQuery::Pattern {
                field,
                prefix,
                regex,
            } => {
                let pattern = Regex::new(regex).map_err(|e| IndexError::InvalidPattern {
                    pattern: regex.clone(),
                    message: e.to_string(),
                })?;
                let terms: Vec<String> = self
                    .view
                    .terms_with_prefix(*field, prefix)?
                    .into_iter()
                    .filter(|t| pattern.is_match(t))
                    .collect();
                self.any_term(*field, &terms)
            }
            CompiledQuery::And(operands) => self.and(operands),
            CompiledQuery::Or(operands) => {
                let mut result = Matches::new();
                for operand in operands {
                    add_scores(&mut result, self.evaluate(operand)?);
                }
                Ok(result)
            }
            CompiledQuery::Not(inner) => {
                let excluded = self.evaluate(inner)?;
                Ok(self
                    .view
                    .live_docs()
                    .into_iter()
                    .filter(|doc| !excluded.contains_key(doc))
                    .map(|doc| (doc, 0.0))
                    .collect())
            }
            CompiledQuery::Boost { query, factor } => {
                let mut result = self.evaluate(query)?;
                for score in result.values_mut() {
                    *score *= factor;
                }
                Ok(result)
            }
        }
    }

    /// Weight of one term occurrence.
    fn weight(&self, field: FieldIndex, term: &str) -> Result<f32, IndexError> {
        match self.scoring {
            ScoringModel::Frequency => Ok(1.0),
            ScoringModel::TfIdf => {
                let df = self.view.doc_freq(field, term)?;
                Ok(idf(self.num_docs, df))
            }
        }
    }

    /// Documents containing one term.
    fn term(&self, field: FieldIndex, term: &str) -> Result<Matches, IndexError> {
        let postings = self.view.postings(field, term)?;
        if postings.is_empty() {
            return Ok(Matches::new());
        }
        let weight = self.weight(field, term)?;
        Ok(postings
            .into_iter()
            .map(|p| (p.doc, p.freq as f32 * weight))
            .collect())
    }

    /// Documents containing any of the expanded terms.
    fn any_term(&self, field: FieldIndex, terms: &[String]) -> Result<Matches, IndexError> {
        debug!(%field, expansions = terms.len(), "expanded wildcard");
        let mut result = Matches::new();
        for term in terms {
            add_scores(&mut result, self.term(field, term)?);
        }
        Ok(result)
    }

    /// Documents where the terms occur within `slop` of each other.
    fn phrase(
        &self,
        field: FieldIndex,
        terms: &[String],
        slop: u32,
        ordered: bool,
    ) -> Result<Matches, IndexError> {
        let mut per_term = Vec::with_capacity(terms.len());
        let mut weight = 0.0;
        for term in terms {
            let postings = self.view.postings(field, term)?;
            if postings.is_empty() {
                // A missing term means the phrase cannot match.
                return Ok(Matches::new());
            }
            weight += self.weight(field, term)?;
            per_term.push(
                postings
                    .into_iter()
                    .map(|p| (p.doc, p.positions))
                    .collect::<BTreeMap<_, _>>(),
            );
        }

        let Some((first, rest)) = per_term.split_first() else {
            return Ok(Matches::new());
        };
        let mut result = Matches::new();
        for (doc, positions) in first {
            let mut lists = vec![positions.as_slice()];
            for other in rest {
                match other.get(doc) {
                    Some(p) => lists.push(p.as_slice()),
                    None => break,
                }
            }
            if lists.len() < per_term.len() {
                continue;
            }
            let spans = count_spans(&lists, slop, ordered);
            if spans > 0 {
                result.insert(*doc, spans as f32 * weight);
            }
        }
        Ok(result)
    }

    /// Intersects positive operands and subtracts negated ones.
    fn and(&self, operands: &[CompiledQuery]) -> Result<Matches, IndexError> {
        let (negated, positive): (Vec<_>, Vec<_>) = operands
            .iter()
            .partition(|o| matches!(o, CompiledQuery::Not(_)));

        let mut result = match positive.split_first() {
            None => self.view.live_docs().into_iter().map(|d| (d, 0.0)).collect(),
            Some((first, rest)) => {
                let mut result = self.evaluate(first)?;
                for operand in rest {
                    if result.is_empty() {
                        break;
                    }
                    let other = self.evaluate(operand)?;
                    result.retain(|doc, _| other.contains_key(doc));
                    for (doc, score) in &mut result {
                        *score += other.get(doc).copied().unwrap_or_default();
                    }
                }
                result
            }
        };

        for operand in negated {
            if result.is_empty() {
                break;
            }
            if let CompiledQuery::Not(inner) = operand {
                let excluded = self.evaluate(inner)?;
                result.retain(|doc, _| !excluded.contains_key(doc));
            }
        }
        Ok(result)
    }
}

/// Inverse document frequency.
pub fn idf(num_docs: u32, doc_freq: u32) -> f32 {
    (num_docs as f32 / (doc_freq as f32 + 1.0)).ln() + 1.0
}

/// Adds `other`'s scores into `into`.
fn add_scores(into: &mut Matches, other: Matches) {
    for (doc, score) in other {
        *into.entry(doc).or_default() += score;
    }
}

/// Counts start positions of the first term that begin a complete span.
///
/// Ordered spans need each term 1..=`slop` positions after the previous one;
/// unordered spans allow either direction, with every position used once.
pub fn count_spans(positions: &[&[u32]], slop: u32, ordered: bool) -> usize {
    let Some((first, rest)) = positions.split_first() else {
        return 0;
    };
    first
        .iter()
        .filter(|&&start| {
            let mut used = vec![start];
            extends(rest, start, slop, ordered, &mut used)
        })
        .count()
}

/// Returns true if the remaining terms can follow `previous` within `slop`.
fn extends(rest: &[&[u32]], previous: u32, slop: u32, ordered: bool, used: &mut Vec<u32>) -> bool {
    let Some((next, rest)) = rest.split_first() else {
        return true;
    };
    for &position in *next {
        let distance = if ordered {
            position.checked_sub(previous)
        } else {
            Some(position.abs_diff(previous))
        };
        let in_reach = distance.is_some_and(|d| (1..=slop).contains(&d));
        if !in_reach || used.contains(&position) {
            continue;
        }
        used.push(position);
        if extends(rest, position, slop, ordered, used) {
            return true;
        }
        used.pop();
    }
    false
}

/// Orders matches by descending score, then ascending document, keeping `limit`.
pub fn rank(matches: Matches, limit: usize) -> Vec<(u32, f32)> {
    let mut ranked: Vec<(u32, f32)> = matches.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{query::compile_xor, test_support::MemoryView};

    fn ti(term: &str) -> CompiledQuery {
        CompiledQuery::Term {
            field: FieldIndex::Title,
            term: term.to_string(),
        }
    }

    fn phrase(terms: &[&str], slop: u32, ordered: bool) -> CompiledQuery {
        CompiledQuery::Phrase {
            field: FieldIndex::Title,
            terms: terms.iter().map(ToString::to_string).collect(),
            slop,
            ordered,
        }
    }

    fn docs(view: &MemoryView, query: &CompiledQuery) -> Vec<u32> {
        Evaluator::new(view, ScoringModel::TfIdf)
            .evaluate(query)
            .unwrap()
            .into_keys()
            .collect()
    }

    fn titles(list: &[&str]) -> MemoryView {
        let mut view = MemoryView::new();
        for title in list {
            view.add(FieldIndex::Title, title);
        }
        view
    }

    #[test]
    fn ordered_spans() {
        assert_eq!(count_spans(&[&[0, 5], &[1, 9]], 1, true), 1);
        assert_eq!(count_spans(&[&[1], &[0]], 1, true), 0);
        assert_eq!(count_spans(&[&[0], &[2]], 1, true), 0);
        assert_eq!(count_spans(&[&[0], &[2]], 2, true), 1);
        assert_eq!(count_spans(&[&[0], &[1], &[2]], 1, true), 1);
    }

    #[test]
    fn unordered_spans() {
        assert_eq!(count_spans(&[&[3], &[1]], 2, false), 1);
        assert_eq!(count_spans(&[&[3], &[1]], 1, false), 0);
        // the same position cannot satisfy two terms
        assert_eq!(count_spans(&[&[1], &[2], &[1]], 1, false), 0);
        assert_eq!(count_spans(&[&[1], &[2], &[3]], 1, false), 1);
    }

    #[test]
    fn adj_matches_only_in_order() {
        let view = titles(&["battery charger", "charger battery", "battery big charger"]);
        assert_eq!(docs(&view, &phrase(&["battery", "charger"], 1, true)), vec![0]);
        assert_eq!(docs(&view, &phrase(&["battery", "charger"], 2, true)), vec![0, 2]);
        assert_eq!(
            docs(&view, &phrase(&["battery", "charger"], 1, false)),
            vec![0, 1]
        );
    }

    #[test]
    fn phrase_with_missing_term_matches_nothing() {
        let view = titles(&["battery charger"]);
        assert!(docs(&view, &phrase(&["battery", "flux"], 3, false)).is_empty());
    }

    #[test]
    fn xor_of_disjoint_sets_is_union() {
        let view = titles(&["battery", "charger", "housing"]);
        let query = compile_xor(vec![ti("battery"), ti("charger")]);
        assert_eq!(docs(&view, &query), vec![0, 1]);
    }

    #[test]
    fn xor_of_identical_sets_is_empty() {
        let view = titles(&["battery charger", "housing"]);
        let query = compile_xor(vec![ti("battery"), ti("charger")]);
        assert!(docs(&view, &query).is_empty());
    }

    #[test]
    fn xor_of_three_excludes_only_full_intersection() {
        let view = titles(&["alpha beta", "alpha beta gamma", "gamma"]);
        let query = compile_xor(vec![ti("alpha"), ti("beta"), ti("gamma")]);
        assert_eq!(docs(&view, &query), vec![0, 2]);
    }

    #[test]
    fn not_subtracts_and_complements() {
        let view = titles(&["battery charger", "battery housing", "housing"]);
        let query = CompiledQuery::And(vec![ti("battery"), ti("charger").negate()]);
        assert_eq!(docs(&view, &query), vec![1]);
        assert_eq!(docs(&view, &ti("battery").negate()), vec![2]);
    }

    #[test]
    fn deleted_documents_never_match() {
        let mut view = titles(&["battery", "battery"]);
        view.delete(0);
        assert_eq!(docs(&view, &ti("battery")), vec![1]);
        assert_eq!(docs(&view, &ti("missing").negate()), vec![1]);
    }

    #[test]
    fn prefix_includes_the_bare_prefix() {
        let view = titles(&["batter", "battery", "batteries"]);
        let query = CompiledQuery::Prefix {
            field: FieldIndex::Title,
            prefix: "batter".into(),
        };
        assert_eq!(docs(&view, &query), vec![0, 1, 2]);
    }

    #[test]
    fn pattern_filters_expansions() {
        let view = titles(&["bat", "bit", "boat"]);
        let query = CompiledQuery::Pattern {
            field: FieldIndex::Title,
            prefix: "b".into(),
            regex: "^b.t$".into(),
        };
        assert_eq!(docs(&view, &query), vec![0, 1]);
    }

    #[test]
    fn tf_idf_prefers_rarer_terms_and_frequency() {
        let view = titles(&["cell cell", "cell", "anode", "anode cathode"]);
        let scores = Evaluator::new(&view, ScoringModel::TfIdf)
            .evaluate(&ti("cell"))
            .unwrap();
        assert!(scores[&0] > scores[&1]);
        assert!((scores[&1] - idf(4, 2)).abs() < 1e-6);

        let scores = Evaluator::new(&view, ScoringModel::Frequency)
            .evaluate(&ti("cell"))
            .unwrap();
        assert!((scores[&0] - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn boost_multiplies() {
        let view = titles(&["cell"]);
        let scores = Evaluator::new(&view, ScoringModel::Frequency)
            .evaluate(&ti("cell").boosted(3.0))
            .unwrap();
        assert!((scores[&0] - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rank_breaks_ties_by_document() {
        let matches: Matches = [(4, 1.0), (2, 1.0), (7, 2.0), (1, 0.5)].into_iter().collect();
        assert_eq!(
            rank(matches, 3),
            vec![(7, 2.0), (2, 1.0), (4, 1.0)]
        );
    }
}
