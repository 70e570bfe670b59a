//! Edit-distance matching for misspelled symptom phrases.

/// Levenshtein distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let m = a_chars.len();
    let n = b_chars.len();

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for (i, &a_ch) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &b_ch) in b_chars.iter().enumerate() {
            let cost = usize::from(a_ch != b_ch);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

/// `1 − distance / longer length`, in [0, 1]. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - edit_distance(a, b) as f64 / longest as f64
}

/// Closest candidate to `span` at or above `threshold`.
///
/// Returns `None` when nothing qualifies or when two different targets tie
/// for best: an ambiguous correction is worse than no correction. Candidates
/// sharing a target (two synonyms of one symptom) never count as a tie.
pub fn best_match<'a, T, I>(span: &str, candidates: I, threshold: f64) -> Option<(&'a T, f64)>
where
    T: PartialEq + 'a,
    I: IntoIterator<Item = (&'a str, &'a T)>,
{
    let span_len = span.chars().count();
    let mut best: Option<(&'a T, f64)> = None;
    let mut ambiguous = false;

    for (phrase, target) in candidates {
        // Length difference alone bounds the similarity from above.
        let phrase_len = phrase.chars().count();
        let longest = span_len.max(phrase_len);
        if longest == 0 {
            continue;
        }
        let upper = 1.0 - span_len.abs_diff(phrase_len) as f64 / longest as f64;
        if upper < threshold {
            continue;
        }

        let score = similarity(span, phrase);
        if score < threshold {
            continue;
        }
        match best {
            Some((_, best_score)) if score > best_score => {
                best = Some((target, score));
                ambiguous = false;
            }
            Some((current, best_score)) if score == best_score && current != target => {
                ambiguous = true;
            }
            Some(_) => {}
            None => best = Some((target, score)),
        }
    }

    if ambiguous {
        None
    } else {
        best
    }
}
