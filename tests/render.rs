//! End-to-end rendering scenarios: realistic templates over a simulated
//! metadata source, plus the language-level guarantees hosts rely on.

mod common;

use chrono::NaiveDate;
use common::{engine_with_table, list};
use pathmint::{FileContext, MetaValue, Template, TemplateEngine};

fn music_engine() -> TemplateEngine {
    engine_with_table(
        &["audio", "exiftool", "ISO", "created"],
        &[
            ("audio:artist", MetaValue::scalar("The Piano Guys")),
            ("audio:album", MetaValue::scalar("Wonders")),
            ("audio:track", MetaValue::scalar("1")),
            ("audio:title", MetaValue::scalar("Story of My Life")),
            ("exiftool:Keywords", list(&["foo", "bar"])),
            ("ISO", MetaValue::scalar("50")),
            (
                "created",
                MetaValue::DateTime(
                    NaiveDate::from_ymd_opt(2020, 2, 4)
                        .unwrap()
                        .and_hms_opt(19, 7, 38)
                        .unwrap(),
                ),
            ),
        ],
    )
}

fn render(engine: &TemplateEngine, source: &str) -> Vec<String> {
    engine
        .render_str(source, &FileContext::new("/library/song.mp3"))
        .unwrap_or_else(|e| panic!("render of {source:?} failed: {e}"))
}

#[test]
fn artist_album_directory() {
    let engine = music_engine();
    assert_eq!(
        render(&engine, "{audio:artist}/{audio:album}"),
        vec!["The Piano Guys/Wonders"]
    );
}

#[test]
fn zero_padded_track_filename() {
    let engine = music_engine();
    assert_eq!(
        render(&engine, "{format:int:02d,{audio:track}} - {audio:title}.mp3"),
        vec!["01 - Story of My Life.mp3"]
    );
}

#[test]
fn keyword_list_joined_in_place() {
    let engine = music_engine();
    assert_eq!(render(&engine, "{,+exiftool:Keywords}"), vec!["foo,bar"]);
}

#[test]
fn keyword_list_expands_to_multiple_outputs() {
    let engine = music_engine();
    assert_eq!(render(&engine, "{exiftool:Keywords}"), vec!["foo", "bar"]);
}

#[test]
fn filters_apply_per_keyword() {
    let engine = engine_with_table(
        &["exiftool"],
        &[("exiftool:Keywords", list(&["FOO", "bar"]))],
    );
    assert_eq!(
        render(&engine, "{exiftool:Keywords|lower|parens}"),
        vec!["(foo)", "(bar)"]
    );
}

#[test]
fn boolean_branch_on_presence() {
    let engine = music_engine();
    assert_eq!(render(&engine, "{audio:title?yes,no}"), vec!["yes"]);

    let empty = engine_with_table(&["audio"], &[]);
    assert_eq!(render(&empty, "{audio:title?yes,no}"), vec!["no"]);
}

#[test]
fn variable_smuggles_reserved_punctuation_into_replace() {
    let engine = engine_with_table(&["audio"], &[("audio:title", MetaValue::scalar("a-b"))]);
    assert_eq!(
        render(&engine, "{var:pipe,{pipe}}{audio:title[-,%pipe]}"),
        vec!["a|b"]
    );
}

#[test]
fn conditional_over_filtered_keywords() {
    let engine = engine_with_table(
        &["exiftool"],
        &[("exiftool:Keywords", list(&["BeachDay", "sun"]))],
    );
    assert_eq!(
        render(&engine, "{exiftool:Keywords|lower contains beach?B,N}"),
        vec!["B"]
    );
}

#[test]
fn strftime_formats_the_creation_date() {
    let engine = music_engine();
    assert_eq!(
        render(&engine, "{created.strftime,%Y-%m-%d-%H%M%S}"),
        vec!["2020-02-04-190738"]
    );
}

#[test]
fn numeric_conditional_passes_the_value_through() {
    let engine = music_engine();
    assert_eq!(render(&engine, "{ISO < 100}"), vec!["50"]);
    assert_eq!(render(&engine, "{ISO < 100?Low,High}"), vec!["Low"]);
    assert_eq!(render(&engine, "{ISO > 100?High,Low}"), vec!["Low"]);
}

#[test]
fn braces_and_percent_escapes() {
    let engine = music_engine();
    assert_eq!(render(&engine, "{openbrace}x{closebrace}"), vec!["{x}"]);
    assert_eq!(render(&engine, "{percent}"), vec!["%"]);
    assert_eq!(render(&engine, "100%%"), vec!["100%"]);
}

#[test]
fn missing_value_without_default_is_the_sentinel() {
    let engine = engine_with_table(&["audio"], &[]);
    assert_eq!(render(&engine, "{audio:composer}"), vec!["_"]);
}

#[test]
fn output_count_is_the_product_of_expanded_fields() {
    let engine = engine_with_table(
        &["a", "b"],
        &[("a", list(&["1", "2"])), ("b", list(&["x", "y", "z"]))],
    );
    assert_eq!(render(&engine, "{a}-{b}").len(), 6);
    assert_eq!(render(&engine, "{a}-{+b}").len(), 2);
    assert_eq!(render(&engine, "{+a}-{+b}").len(), 1);
}

#[test]
fn parsed_templates_are_reusable_across_files() {
    let engine = music_engine();
    let template = Template::parse("{audio:album}/{audio:title}.mp3").unwrap();
    let first = engine
        .render(&template, &FileContext::new("/library/a.mp3"))
        .unwrap();
    let second = engine
        .render(&template, &FileContext::new("/library/b.mp3"))
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(first, vec!["Wonders/Story of My Life.mp3"]);
}

#[test]
fn rendered_lists_are_never_empty() {
    let engine = music_engine();
    for source in [
        "",
        "plain",
        "{audio:missing}",
        "{exiftool:Keywords}",
        "{,+exiftool:Keywords}",
        "{audio:title|upper}[{ISO}]",
    ] {
        let rendered = render(&engine, source);
        assert!(!rendered.is_empty(), "{source:?} rendered to nothing");
    }
}
