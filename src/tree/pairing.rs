//! Header/source pairing
//!
//! Partitions the header and source listings of one mirrored directory level into
//! header-only, source-only, and matched class entries.

use std::collections::HashMap;

/// Derives the pairing stem of a file name.
pub trait StemRule {
    /// Stem for `name`, or `None` when the name is not recognised by this rule.
    fn stem<'n>(&self, name: &'n str) -> Option<&'n str>;
}

/// Strips one of a fixed set of extensions.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionRule<'a> {
    extensions: &'a [String],
}

impl<'a> ExtensionRule<'a> {
    pub fn new(extensions: &'a [String]) -> Self {
        Self { extensions }
    }
}

impl StemRule for ExtensionRule<'_> {
    fn stem<'n>(&self, name: &'n str) -> Option<&'n str> {
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        self.extensions.iter().any(|e| e == ext).then_some(stem)
    }
}

/// A header and a source sharing a stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedClass<'a> {
    pub stem: &'a str,
    pub header: &'a str,
    pub source: &'a str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairing<'a> {
    /// Header-list order
    pub headers_only: Vec<&'a str>,
    /// Source-list order
    pub sources_only: Vec<&'a str>,
    /// Header-list order
    pub classes: Vec<PairedClass<'a>>,
}

/// Pair headers with sources by stem.
///
/// A file not recognised by its side's rule never pairs. Each source pairs at most once:
/// the first header with a given stem claims it.
pub fn pair<'a>(
    headers: &'a [String],
    sources: &'a [String],
    header_rule: &dyn StemRule,
    source_rule: &dyn StemRule,
) -> Pairing<'a> {
    let mut unclaimed: HashMap<&'a str, usize> = HashMap::new();
    for (index, source) in sources.iter().enumerate() {
        if let Some(stem) = source_rule.stem(source) {
            unclaimed.entry(stem).or_insert(index);
        }
    }

    let mut claimed = vec![false; sources.len()];
    let mut pairing = Pairing::default();

    for header in headers {
        let matched = header_rule
            .stem(header)
            .and_then(|stem| unclaimed.remove_entry(stem));
        match matched {
            Some((stem, index)) => {
                claimed[index] = true;
                pairing.classes.push(PairedClass {
                    stem,
                    header,
                    source: &sources[index],
                });
            }
            None => pairing.headers_only.push(header),
        }
    }

    pairing.sources_only = sources
        .iter()
        .zip(claimed)
        .filter(|(_, claimed)| !claimed)
        .map(|(source, _)| source.as_str())
        .collect();

    pairing
}
