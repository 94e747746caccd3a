//! Known header spellings mapped to canonical names
//!
//! Keys are already basic-cleaned (see `normalize::basic_clean`). The fuzzy
//! tier is consulted first, then the common tier on the result.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Long or oddly punctuated headers seen verbatim in exported forms
pub static FUZZY_VARIANTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("what_s_your_linkedin", "linkedin"),
        ("what_s_your_linked_in", "linkedin"),
        (
            "kindly_provide_the_name_of_the_person_who_invited_you_to_this_e",
            "inviter_name",
        ),
        // Never produced by basic_clean, which trims trailing '_'
        ("total_rsvp_approved_", "total_rsvp_approved"),
        ("total_pending_", "total_pending"),
        ("total_sign_ups_", "total_sign_ups"),
    ])
});

/// Common synonyms plus identity entries for every canonical field
pub static COMMON_VARIANTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("type_of_company", "type_of_company"),
        ("total_count", "total_count"),
        ("total_rsvp_approved", "total_rsvp_approved"),
        ("total_pending", "total_pending"),
        ("total_sign_ups", "total_sign_ups"),
        ("notable_companies", "notable_companies"),
        ("color_label", "color_label"),
        ("color", "color_label"),
        ("pct_increase", "pct_increase"),
        ("percent_increase", "pct_increase"),
        ("percentage_increase", "pct_increase"),
        // Spreadsheet placeholder for an unlabelled third column
        ("unnamed_2", "pct_increase"),
        ("job_title", "job_title"),
        ("company", "company"),
        ("approval_status", "approval_status"),
        ("inviter_name", "inviter_name"),
        ("linkedin", "linkedin"),
        ("telegram", "telegram"),
        ("name", "name"),
        ("first_name", "first_name"),
        ("last_name", "last_name"),
        ("email", "email"),
    ])
});
