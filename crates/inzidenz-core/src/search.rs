//! Name normalisation, bucket keys and the fuzzy match predicate.
//!
//! Names and queries are compared upper-cased. A name matches a query when it
//! contains the query, or when their sequence-matcher similarity ratio is at
//! least [`SIMILARITY_THRESHOLD`].

use std::collections::HashMap;

/// Minimum similarity ratio for a non-substring match.
pub const SIMILARITY_THRESHOLD: f64 = 0.8;

/// Case-normalise a name or query.
pub fn normalize(name: &str) -> String { name.to_uppercase() }

/// The search bucket for `name`: the first character of its normalised form.
///
/// Returns `None` for an empty name.
pub fn bucket_key(name: &str) -> Option<String> {
  normalize(name).chars().next().map(String::from)
}

/// Whether the normalised `name` matches the normalised `query`.
pub fn is_match(query: &str, name: &str) -> bool {
  name.contains(query) || similarity_ratio(query, name) >= SIMILARITY_THRESHOLD
}

/// Similarity of two strings in `[0, 1]`: `2·M / T`, where `M` is the number
/// of characters in the matching blocks and `T` the combined length.
///
/// Matching blocks are found by taking the longest common substring and
/// recursing on the pieces to its left and right. Ties go to the match that
/// starts earliest in `a`, then earliest in `b`. The result depends on
/// argument order.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();

  let total = a.len() + b.len();
  if total == 0 {
    return 1.0;
  }

  2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
  let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
  for (j, c) in b.iter().enumerate() {
    b2j.entry(*c).or_default().push(j);
  }

  let mut matched = 0;
  let mut pending = vec![(0, a.len(), 0, b.len())];

  while let Some((alo, ahi, blo, bhi)) = pending.pop() {
    let (i, j, size) = longest_match(a, &b2j, (alo, ahi), (blo, bhi));
    if size == 0 {
      continue;
    }
    matched += size;
    if alo < i && blo < j {
      pending.push((alo, i, blo, j));
    }
    if i + size < ahi && j + size < bhi {
      pending.push((i + size, ahi, j + size, bhi));
    }
  }

  matched
}

/// Longest block `a[i..i+size] == b[j..j+size]` inside the given ranges.
fn longest_match(
  a: &[char],
  b2j: &HashMap<char, Vec<usize>>,
  (alo, ahi): (usize, usize),
  (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
  let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

  // Length of the match ending at (i - 1, j), keyed by j.
  let mut run_lengths: HashMap<usize, usize> = HashMap::new();

  for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
    let mut next: HashMap<usize, usize> = HashMap::new();
    for &j in b2j.get(c).into_iter().flatten() {
      if j < blo {
        continue;
      }
      if j >= bhi {
        break;
      }
      let k = j
        .checked_sub(1)
        .and_then(|prev| run_lengths.get(&prev))
        .copied()
        .unwrap_or(0)
        + 1;
      next.insert(j, k);
      if k > best_size {
        best_i = i + 1 - k;
        best_j = j + 1 - k;
        best_size = k;
      }
    }
    run_lengths = next;
  }

  (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn approx(a: f64, b: f64) -> bool { (a - b).abs() < 1e-9 }

  #[test]
  fn identical_strings_score_one() {
    assert!(approx(similarity_ratio("BERLIN", "BERLIN"), 1.0));
    assert!(approx(similarity_ratio("", ""), 1.0));
  }

  #[test]
  fn disjoint_strings_score_zero() {
    assert!(approx(similarity_ratio("ABC", "XYZ"), 0.0));
    assert!(approx(similarity_ratio("ABC", ""), 0.0));
  }

  #[test]
  fn ratio_counts_recursive_blocks() {
    // "NCHEN" plus "M" out of 8 + 7 characters.
    assert!(approx(similarity_ratio("MUENCHEN", "MÜNCHEN"), 0.8));
    // "NCH" plus "M" out of 5 + 7 characters.
    assert!(approx(similarity_ratio("MUNCH", "MÜNCHEN"), 8.0 / 12.0));
  }

  #[test]
  fn ratio_is_order_sensitive() {
    // Crossing blocks: only one side of the longest match can be used.
    assert!(approx(similarity_ratio("ABXCD", "CDXAB"), 0.4));
    assert!(approx(similarity_ratio("AAB", "ABA"), 4.0 / 6.0));
  }

  #[test]
  fn matches_by_containment_or_ratio() {
    assert!(is_match("MÜNCH", "MÜNCHEN"));
    assert!(is_match("MUENCHEN", "MÜNCHEN"));
    assert!(!is_match("MUNCH", "MÜNCHEN"));
    assert!(!is_match("ABC", "BERLIN"));
  }

  #[test]
  fn buckets_ignore_case() {
    assert_eq!(bucket_key("mü"), bucket_key("MÜ"));
    assert_eq!(bucket_key("münchen").as_deref(), Some("M"));
    assert_eq!(bucket_key("ßtadt").as_deref(), Some("S"));
    assert_eq!(bucket_key(""), None);
  }
}
