//! Decodes Outfiter customization links (`...?o=130&c1=19&c2=86&a1=1&f=m`) into a
//! partial [AppearanceDescriptor]. Never fails: anything unparseable is left out.

use std::borrow::Cow;
use std::collections::HashMap;

use url::{form_urlencoded, Url};

use super::descriptor::{AppearanceDescriptor, Gender, ADDON_FIRST, ADDON_SECOND};

/// First non-blank value per query key. Blank values (`a1=` or a bare `a1`)
/// are dropped, so they do not count as present.
fn query_values<'a>(
    pairs: impl Iterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
) -> HashMap<String, String> {
    let mut values = HashMap::new();
    for (key, value) in pairs {
        if value.is_empty() {
            continue;
        }
        values
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    values
}

/// Query part of a link that is not an absolute URL: after the first `?`, up to any `#`.
fn relative_query(raw: &str) -> &str {
    let Some((_, query)) = raw.split_once('?') else {
        return "";
    };
    query.split_once('#').map_or(query, |(query, _)| query)
}

fn int_value(values: &HashMap<String, String>, key: &str) -> Option<u32> {
    values.get(key).and_then(|raw| raw.trim().parse::<u32>().ok())
}

/// Decode an Outfiter link.
///
/// `o` is the lookType, `c1..c4` are head/body/legs/feet colors, `a1`/`a2` set the
/// addon bits by presence alone, `fm` forces female and `f` goes through
/// [Gender::from_flag]. Scheme-less, relative and bracketed links still have
/// their query decoded; a link without any query yields only `addons = 0`.
pub fn decode_outfiter_url(raw: &str) -> AppearanceDescriptor {
    let raw = raw.trim();
    let values = match Url::parse(raw) {
        Ok(url) => query_values(url.query_pairs()),
        Err(_) => query_values(form_urlencoded::parse(relative_query(raw).as_bytes())),
    };

    let mut descriptor = AppearanceDescriptor {
        look_type: int_value(&values, "o"),
        head: int_value(&values, "c1"),
        body: int_value(&values, "c2"),
        legs: int_value(&values, "c3"),
        feet: int_value(&values, "c4"),
        ..AppearanceDescriptor::default()
    };

    if values.contains_key("a1") {
        descriptor.add_addons(ADDON_FIRST);
    }
    if values.contains_key("a2") {
        descriptor.add_addons(ADDON_SECOND);
    }

    descriptor.gender = if values.contains_key("fm") {
        Some(Gender::Female)
    } else {
        values.get("f").and_then(|flag| Gender::from_flag(flag))
    };

    descriptor
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn decodes_type_colors_and_addons() {
        let descriptor = decode_outfiter_url("https://x/Outfiter?o=130&c1=19&c2=86&a1=1");
        assert_eq!(
            descriptor,
            AppearanceDescriptor {
                look_type: Some(130),
                head: Some(19),
                body: Some(86),
                addons: 1,
                ..AppearanceDescriptor::default()
            }
        );
    }

    #[test]
    fn non_integer_values_are_omitted() {
        let descriptor = decode_outfiter_url("https://x/Outfiter?o=abc&c1=1.5&c2=-4&c3=7&c4=");
        assert_eq!(descriptor.look_type, None);
        assert_eq!(descriptor.head, None);
        assert_eq!(descriptor.body, None);
        assert_eq!(descriptor.legs, Some(7));
        assert_eq!(descriptor.feet, None);
    }

    #[test]
    fn both_addon_flags_give_mask_three() {
        let descriptor = decode_outfiter_url("https://x/Outfiter?o=1&a2=1&a1=0");
        assert_eq!(descriptor.addons, 3);
    }

    #[test]
    fn blank_addon_flag_is_not_present() {
        let descriptor = decode_outfiter_url("https://x/Outfiter?o=1&a1=&a2");
        assert_eq!(descriptor.addons, 0);
    }

    #[test]
    fn fm_forces_female_over_f() {
        let descriptor = decode_outfiter_url("https://x/Outfiter?o=1&f=m&fm=1");
        assert_eq!(descriptor.gender, Some(Gender::Female));
    }

    #[test]
    fn f_flag_is_normalized() {
        assert_eq!(
            decode_outfiter_url("https://x/Outfiter?f=male").gender,
            Some(Gender::Male)
        );
        assert_eq!(
            decode_outfiter_url("https://x/Outfiter?f=F").gender,
            Some(Gender::Female)
        );
        assert_eq!(decode_outfiter_url("https://x/Outfiter?f=2").gender, None);
    }

    #[test]
    fn first_occurrence_of_a_repeated_key_wins() {
        let descriptor = decode_outfiter_url("https://x/Outfiter?o=128&o=136");
        assert_eq!(descriptor.look_type, Some(128));
    }

    #[test]
    fn malformed_url_degrades_to_empty_descriptor() {
        let descriptor = decode_outfiter_url("not a url at all");
        assert_eq!(descriptor, AppearanceDescriptor::default());
        assert_eq!(descriptor.addons, 0);
    }

    #[test]
    fn scheme_less_links_are_decoded() {
        let expected = AppearanceDescriptor {
            look_type: Some(130),
            head: Some(19),
            ..AppearanceDescriptor::default()
        };
        assert_eq!(decode_outfiter_url("tibia.fandom.com/Outfiter?o=130&c1=19"), expected);
        assert_eq!(decode_outfiter_url("Outfiter?o=130&c1=19"), expected);
        assert_eq!(decode_outfiter_url("Outfiter?o=130&c1=19#top"), expected);
    }

    #[test]
    fn bracketed_wiki_link_keeps_leading_parameters() {
        let descriptor =
            decode_outfiter_url("[https://tibia.fandom.com/Outfiter?o=130&c1=19 link]");
        assert_eq!(
            descriptor,
            AppearanceDescriptor {
                look_type: Some(130),
                ..AppearanceDescriptor::default()
            }
        );
    }

    #[test]
    fn relative_link_flags_and_gender_are_decoded() {
        let descriptor = decode_outfiter_url("wiki/Outfiter?o=136&a2=1&f=fm");
        assert_eq!(descriptor.look_type, Some(136));
        assert_eq!(descriptor.addons, 2);
        assert_eq!(descriptor.gender, Some(Gender::Female));
    }

    #[test]
    fn decoding_is_idempotent() {
        let url = "https://tibia.fandom.com/Outfiter?o=266&c1=0&c2=94&c3=79&c4=0&a1=1&a2=1&f=f";
        assert_eq!(decode_outfiter_url(url), decode_outfiter_url(url));
    }
}
