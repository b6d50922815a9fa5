//! Compatibility of stems and endings.
use crate::inflection::{InflectionContext, LatinDegree, LatinMood, LatinTense};
use crate::stems::Stem;
use crate::tables::{merge_tags, InflectionEnding};

const COMP_ONLY: &str = "comp_only";
const NO_FUTURE: &str = "no_fut";
const NO_FUTURE_PARTICIPLE: &str = "no_fut_part";

/// A stem value restricts the ending only when present.
fn restricts<T: PartialEq>(stem: Option<T>, end: Option<T>) -> bool {
    stem.is_some() && stem != end
}

/// Merges a stem of a lemma file with an ending of its table.
///
/// The stem must be a subset of the ending in every category, except that
/// an ending without gender accepts any gender and a positive stem accepts
/// an ending without degree. The result narrows the ending's cases and
/// genders to the stem's.
fn merge_regular(stem: &InflectionContext, end: &InflectionContext) -> Option<InflectionContext> {
    let internal_tags = merge_tags(&stem.internal_tags, &end.internal_tags);
    let has_tag = |tag: &str| internal_tags.iter().any(|t| t == tag);
    if has_tag(COMP_ONLY) {
        return None;
    }

    let (s, e) = (stem.grammatical_data, end.grammatical_data);
    let stem_cases = s.case_bits();
    if stem_cases & e.case_bits() != stem_cases {
        return None;
    }
    let stem_genders = s.gender_bits();
    if e.gender_bits() != 0 && stem_genders & e.gender_bits() != stem_genders {
        return None;
    }
    if restricts(s.mood(), e.mood())
        || restricts(s.number(), e.number())
        || restricts(s.person(), e.person())
        || restricts(s.tense(), e.tense())
        || restricts(s.voice(), e.voice())
    {
        return None;
    }
    let positive_default = s.degree() == Some(LatinDegree::Positive) && e.degree().is_none();
    if restricts(s.degree(), e.degree()) && !positive_default {
        return None;
    }

    let is_future = e.tense() == Some(LatinTense::Future);
    if is_future && has_tag(NO_FUTURE) {
        return None;
    }
    if is_future && e.mood() == Some(LatinMood::Participle) && has_tag(NO_FUTURE_PARTICIPLE) {
        return None;
    }

    let mut data = e;
    if stem_cases != 0 {
        data = data.with_case_bits(stem_cases);
    }
    if stem_genders != 0 {
        data = data.with_gender_bits(stem_genders);
    }
    Some(InflectionContext {
        grammatical_data: data,
        tags: merge_tags(&stem.tags, &end.tags),
        internal_tags,
    })
}

/// Merges a `stem@template` stem with an ending by intersection.
fn merge_template(stem: &InflectionContext, end: &InflectionContext) -> Option<InflectionContext> {
    let data = stem.grammatical_data.merge(end.grammatical_data)?;
    Some(InflectionContext {
        grammatical_data: data,
        tags: merge_tags(&stem.tags, &end.tags),
        internal_tags: merge_tags(&stem.internal_tags, &end.internal_tags),
    })
}

/// Merges the data of a stem and one of its endings, or returns `None` if
/// they are incompatible.
pub(crate) fn merge_stem_and_ending(stem: &Stem, end: &InflectionEnding) -> Option<InflectionContext> {
    match stem.code {
        None => merge_template(&stem.context, &end.context),
        Some(_) => merge_regular(&stem.context, &end.context),
    }
}
