//! Decomposition of surface tokens into the words they contract.

const PRODELISION_MARK: char = '\'';
const PRODELISION_VARIANTS: [char; 3] = ['’', '‘', '`'];
const ENCLITICS: [&str; 7] = ["que", "ne", "ve", "ue", "met", "cum", "dum"];

fn split_prodelision(token: &str) -> Vec<Vec<String>> {
    if let Some((left, right)) = token.split_once(PRODELISION_MARK) {
        let elided = format!("e{}", right);
        if left.is_empty() {
            return vec![vec![elided]];
        }
        return vec![vec![left.to_string(), elided]];
    }
    if let Some(stripped) = token.strip_suffix("ust") {
        return vec![
            vec![token.to_string()],
            vec![format!("{}us", stripped), "est".to_string()],
        ];
    }
    if let Some(stripped) = token.strip_suffix("st") {
        return vec![
            vec![token.to_string()],
            vec![stripped.to_string(), "est".to_string()],
        ];
    }
    vec![vec![token.to_string()]]
}

fn split_enclitic(variant: &[String], enclitic: &str) -> Vec<String> {
    let mut split = Vec::with_capacity(variant.len() + 1);
    for chunk in variant {
        match chunk.strip_suffix(enclitic) {
            Some(host) if !(enclitic == "ue" && chunk.ends_with("que")) => {
                split.push(host.to_string());
                split.push(enclitic.to_string());
            }
            _ => split.push(chunk.clone()),
        }
    }
    split
}

/// Decomposes a token into every plausible sequence of words.
///
/// Prodelision is undone first (`verum'st` is `verum est`; `verumst` may be
/// either itself or `verum est`). Then, for each variant and each enclitic,
/// a further variant is added with the enclitic split off every chunk that
/// ends with it. The first decomposition is always the token itself unless an
/// explicit elision mark makes the split unambiguous.
///
/// # Examples
///
/// ```
/// use morceus::decompose::decompose_token;
///
/// assert_eq!(
///     decompose_token("facillimumquest"),
///     vec![
///         vec!["facillimumquest"],
///         vec!["facillimumque", "est"],
///         vec!["facillimum", "que", "est"],
///     ],
/// );
/// ```
pub fn decompose_token(token: &str) -> Vec<Vec<String>> {
    let normalized: String = token
        .trim()
        .chars()
        .map(|c| {
            if PRODELISION_VARIANTS.contains(&c) {
                PRODELISION_MARK
            } else {
                c
            }
        })
        .collect();

    let mut results = vec![];
    for variant in split_prodelision(&normalized) {
        let mut splits = vec![];
        for enclitic in ENCLITICS {
            let split = split_enclitic(&variant, enclitic);
            if split.len() > variant.len() {
                splits.push(split);
            }
        }
        results.push(variant);
        results.extend(splits);
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple() {
        assert_eq!(decompose_token("verum"), vec![vec!["verum"]]);
        assert_eq!(decompose_token(" verum "), vec![vec!["verum"]]);
    }

    #[test]
    fn test_marked_prodelision() {
        assert_eq!(decompose_token("'st"), vec![vec!["est"]]);
        assert_eq!(decompose_token("verum'st"), vec![vec!["verum", "est"]]);
        assert_eq!(decompose_token("verum’st"), vec![vec!["verum", "est"]]);
        assert_eq!(decompose_token("verum`st"), vec![vec!["verum", "est"]]);
    }

    #[test]
    fn test_unmarked_prodelision() {
        assert_eq!(
            decompose_token("verumst"),
            vec![vec!["verumst"], vec!["verum", "est"]]
        );
        assert_eq!(
            decompose_token("verust"),
            vec![vec!["verust"], vec!["verus", "est"]]
        );
    }

    #[test]
    fn test_enclitics() {
        assert_eq!(
            decompose_token("facillimumque"),
            vec![vec!["facillimumque"], vec!["facillimum", "que"]]
        );
        assert_eq!(
            decompose_token("ubicumque"),
            vec![vec!["ubicumque"], vec!["ubicum", "que"]]
        );
        assert_eq!(
            decompose_token("virumve"),
            vec![vec!["virumve"], vec!["virum", "ve"]]
        );
    }

    #[test]
    fn test_enclitic_then_prodelision() {
        assert_eq!(
            decompose_token("facillimumquest"),
            vec![
                vec!["facillimumquest"],
                vec!["facillimumque", "est"],
                vec!["facillimum", "que", "est"],
            ]
        );
    }

    #[test]
    fn test_identity_first() {
        for token in ["arma", "virumque", "cano", "troiaest", "tecum"] {
            assert_eq!(decompose_token(token)[0], vec![token.to_string()]);
        }
    }
}
