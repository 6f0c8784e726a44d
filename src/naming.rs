//! Derivation of new envelope names.
//!
//! When an envelope is split, bounced, or forked, its copy needs a name
//! that is unique within the processing run but still traceable to its
//! lineage. Naive suffixing has two failure modes: names that grow
//! without bound, and bounce loops that fork the same lineage forever.
//! Both are closed off here — derived names stay strictly below
//! [`MAX_NAME_LENGTH`] characters, and a lineage refuses its
//! [`MAX_DERIVATION_DEPTH`]-plus-first nested derivation.
//!
//! A derived name has the shape `{stem}!{depth}!{token}`, where the stem
//! is the (possibly truncated) source name, depth counts derivations in
//! the lineage, and the token is a freshly generated ULID. The depth
//! rides in the tail of the name itself, so no side table is needed and
//! truncating the stem can never lose it.

use crate::error::{Error, Result};

/// Derived names are always strictly shorter than this.
pub const MAX_NAME_LENGTH: usize = 86;

/// Number of derivations a lineage permits; the next one fails.
pub const MAX_DERIVATION_DEPTH: u32 = 7;

const MARKER: char = '!';

/// `!{depth}!{token}`, with a single-digit depth and a 26-character ULID.
const TAIL_LENGTH: usize = 1 + 1 + 1 + ulid::ULID_LEN;

/// Derive a new, unique name from `current`.
///
/// The result always differs from the input (even for the empty string)
/// and is always shorter than [`MAX_NAME_LENGTH`] characters.
///
/// # Errors
///
/// [`Error::DerivationOverflow`] when `current` already records
/// [`MAX_DERIVATION_DEPTH`] derivations, which signals a derivation storm
/// (e.g. a bounce loop). Callers should stop forking this lineage.
#[tracing::instrument(level = "trace")]
pub fn derive_new_name(current: &str) -> Result<String> {
    let depth = derivation_depth(current);
    if depth >= MAX_DERIVATION_DEPTH {
        tracing::warn!(name = current, depth, "derivation storm detected");
        return Err(Error::DerivationOverflow(current.to_owned()));
    }

    let stem = truncated_stem(current);
    let derived = format!("{stem}{MARKER}{}{MARKER}{}", depth + 1, ulid::Ulid::new());
    debug_assert!(derived.len() < MAX_NAME_LENGTH);

    Ok(derived)
}

/// Number of derivations already recorded in `name`.
///
/// A derived name always ends in `!{depth}!{token}`; the tail is appended
/// after truncation, so it is intact even when earlier parts of the
/// lineage were cut out of the stem. Anything that does not parse as such
/// a tail is a seed name at depth zero.
fn derivation_depth(name: &str) -> u32 {
    let mut fields = name.rsplitn(3, MARKER);
    let _token = fields.next();
    let depth = fields.next().and_then(|d| d.parse().ok());

    match (depth, fields.next()) {
        (Some(depth), Some(_stem)) => depth,
        _ => 0,
    }
}

/// Cut the stem so that the derivation tail always fits under the length
/// ceiling, respecting char boundaries.
fn truncated_stem(name: &str) -> &str {
    let budget = MAX_NAME_LENGTH - 1 - TAIL_LENGTH;
    if name.len() <= budget {
        return name;
    }

    let mut end = budget;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
