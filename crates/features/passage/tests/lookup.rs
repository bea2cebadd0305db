use lectio_corpus::sample::sample_corpus;
use lectio_corpus::{BookSpec, Corpus, RawVerse, Scheme, Segment, Word};
use lectio_domain::features::{Capabilities, Feature};
use lectio_domain::modules::{Category, DisplayMode, ModuleId, ModuleInfo};
use lectio_domain::passage::TrimReason;
use lectio_domain::reference::{Direction, Rounding};
use lectio_passage::{LookupService, OrdinalRequest, PassageError, PassageRequest, Services};

fn service() -> LookupService {
    LookupService::new(Services::from_corpus(&sample_corpus()))
}

fn request(version: &str, reference: &str) -> PassageRequest {
    PassageRequest {
        version: version.to_owned(),
        reference: reference.to_owned(),
        ..PassageRequest::default()
    }
}

fn raw_verse(scheme: &Scheme, reference: &str, text: &str) -> RawVerse {
    let resolved = scheme.resolve(reference).unwrap();
    let ordinal = resolved.range.start_ordinal;
    let key = scheme.key_of(ordinal).unwrap();
    RawVerse {
        ordinal,
        osis_id: resolved.osis_id,
        chapter: key.chapter,
        verse: key.verse,
        heading: None,
        segments: vec![Segment::Word(Word::plain(text))],
    }
}

fn plain_module(id: &str, versification: &str) -> ModuleInfo {
    ModuleInfo {
        id: ModuleId::new(id),
        name: id.to_owned(),
        language: "en".to_owned(),
        category: Category::Bible,
        capabilities: Capabilities::empty(),
        versification: versification.into(),
    }
}

/// Two Psalms schemes that disagree harder than the sample corpus: the
/// merged scheme folds chapter 2 away entirely, so the split module's
/// chapter 2 collapses onto the last verse of chapter 1.
fn divergent_service() -> LookupService {
    let merged = Scheme::new("merged", vec![BookSpec::new("Ps", "Psalms", &[2, 0, 1])]);
    let split = Scheme::new("split", vec![BookSpec::new("Ps", "Psalms", &[2, 2, 1])]);

    let merged_verses = vec![
        raw_verse(&merged, "Ps 1:1", "merged one"),
        raw_verse(&merged, "Ps 1:2", "merged two"),
        raw_verse(&merged, "Ps 3:1", "merged three"),
    ];
    // No Ps 1:2; chapter 2 carries the divergent text.
    let split_verses = vec![
        raw_verse(&split, "Ps 1:1", "split one"),
        raw_verse(&split, "Ps 2:1", "split extra"),
        raw_verse(&split, "Ps 2:2", "split surplus"),
        raw_verse(&split, "Ps 3:1", "split three"),
    ];

    let corpus = Corpus::builder()
        .scheme(merged)
        .scheme(split)
        .module(plain_module("MRG", "merged"), merged_verses)
        .module(plain_module("SPL", "split"), split_verses)
        .init()
        .unwrap();
    LookupService::new(Services::from_corpus(&corpus))
}

#[test]
fn single_version_lookup_renders_requested_features() {
    let service = service();
    let result = service
        .lookup(&PassageRequest {
            options: Some("VERSE_NUMBERS,RED_LETTER".to_owned()),
            ..request("KJV", "John 3:3")
        })
        .unwrap();

    assert_eq!(result.osis_id, "John.3.3");
    assert!(result.html.contains(r#"<span class="verse">3</span>"#));
    assert!(result.html.contains(r#"<span class="red">Verily</span>"#));
    assert_eq!(result.applied_features, vec![Feature::VerseNumbers, Feature::RedLetter]);
    assert!(result.removed_features.is_empty());
    assert!(result.invariants_hold());
}

#[test]
fn absent_options_fall_back_to_module_defaults() {
    let service = service();
    let result = service.lookup(&request("KJV", "Gen 1:1")).unwrap();

    // KJV defaults include headings; Gen 1:1 opens with one.
    assert!(result.html.contains(r#"<h3 class="heading">The Creation</h3>"#));
    assert!(result.applied_features.contains(&Feature::VerseNumbers));
}

#[test]
fn unsupported_features_are_trimmed_but_echoed() {
    let service = service();
    // KJV carries no Strong's tagging.
    let result = service
        .lookup(&PassageRequest {
            options: Some("VERSE_NUMBERS,STRONGS".to_owned()),
            ..request("KJV", "Gen 1:1")
        })
        .unwrap();

    assert_eq!(result.applied_features, vec![Feature::VerseNumbers]);
    assert_eq!(result.removed_features.len(), 1);
    assert_eq!(result.removed_features[0].feature, Feature::Strongs);
    assert_eq!(result.removed_features[0].reason, TrimReason::NotSupportedByModule);
    assert_eq!(result.selected_features, vec![Feature::VerseNumbers, Feature::Strongs]);
}

#[test]
fn unknown_option_tokens_are_ignored() {
    let service = service();
    let result = service
        .lookup(&PassageRequest {
            options: Some("VERSE_NUMBERS,NO_SUCH_THING".to_owned()),
            ..request("KJV", "Gen 1:1")
        })
        .unwrap();
    assert_eq!(result.applied_features, vec![Feature::VerseNumbers]);
    assert!(result.removed_features.is_empty());
}

#[test]
fn strongs_renders_in_single_mode_when_supported() {
    let service = service();
    let result = service
        .lookup(&PassageRequest {
            options: Some("STRONGS,MORPHOLOGY".to_owned()),
            ..request("WEB", "Gen 1:1")
        })
        .unwrap();
    assert!(result.html.contains(r#"<sup class="strongs">H7225</sup>"#));
    assert!(result.html.contains(r#"<sup class="morph">V-Qal-Perf-3ms</sup>"#));
}

#[test]
fn display_hint_without_extras_collapses_to_single() {
    let service = service();
    let result = service
        .lookup(&PassageRequest {
            display_mode: Some("INTERLEAVED_BY_VERSE".to_owned()),
            options: Some("VERSE_NUMBERS".to_owned()),
            ..request("KJV", "John 3:2")
        })
        .unwrap();
    assert!(result.html.starts_with(r#"<div class="passage" data-module="KJV""#));
}

#[test]
fn interleaved_by_verse_stacks_versions_per_row() {
    let service = service();
    let result = service
        .lookup(&PassageRequest {
            extra_versions: Some("WEB".to_owned()),
            display_mode: Some("INTERLEAVED_BY_VERSE".to_owned()),
            options: Some("VERSE_NUMBERS".to_owned()),
            ..request("KJV", "John 3:2-3")
        })
        .unwrap();

    assert!(result.html.contains(r#"<div class="verse-group">"#));
    assert!(result.html.contains(r#"data-module="KJV""#));
    assert!(result.html.contains(r#"data-module="WEB""#));
    // The leftmost module numbers the rows.
    assert!(result.html.contains(r#"<span class="verse">2</span>"#));
    assert!(result.html.contains("Most certainly"));
}

#[test]
fn interleaved_annotation_features_trim_by_mode() {
    let service = service();
    // Both modules could supply Strong's in single mode; the stacked layout
    // cannot.
    let result = service
        .lookup(&PassageRequest {
            extra_versions: Some("KJV".to_owned()),
            display_mode: Some("INTERLEAVED_BY_VERSE".to_owned()),
            options: Some("STRONGS".to_owned()),
            ..request("WEB", "Gen 1:1")
        })
        .unwrap();
    assert_eq!(result.removed_features[0].reason, TrimReason::IncompatibleWithMode);
    assert!(!result.html.contains("strongs"));
}

#[test]
fn missing_verses_render_placeholders() {
    let service = service();
    // WEB has no Psalms text in the sample corpus.
    let result = service
        .lookup(&PassageRequest {
            extra_versions: Some("WEB".to_owned()),
            display_mode: Some("INTERLEAVED_BY_VERSE".to_owned()),
            options: Some("VERSE_NUMBERS".to_owned()),
            ..request("KJV", "Ps 2")
        })
        .unwrap();
    assert!(result.html.contains(r#"<div class="version empty" data-module="WEB"></div>"#));
    assert!(result.html.contains("heathen rage"));
}

#[test]
fn column_mode_renders_a_table() {
    let service = service();
    let result = service
        .lookup(&PassageRequest {
            extra_versions: Some("WEB".to_owned()),
            display_mode: Some("COLUMN".to_owned()),
            options: Some("TINY_VERSE_NUMBERS".to_owned()),
            ..request("KJV", "John 3:3")
        })
        .unwrap();
    assert!(result.html.starts_with(r#"<table class="passage columns""#));
    assert!(result.html.contains("<th>KJV</th><th>WEB</th>"));
    assert!(result.html.contains(r#"<span class="verse tiny">3:3</span>"#));
}

#[test]
fn divergent_numbering_carries_a_secondary_label() {
    let service = divergent_service();
    let result = service
        .lookup(&PassageRequest {
            extra_versions: Some("SPL".to_owned()),
            display_mode: Some("INTERLEAVED_BY_VERSE".to_owned()),
            options: Some("VERSE_NUMBERS".to_owned()),
            ..request("MRG", "Ps")
        })
        .unwrap();

    // The split module's Ps 2:1 lands on the merged row Ps 1:2 and keeps
    // its own number as a small label.
    assert!(result.html.contains(
        r#"<span class="module-label">SPL</span><span class="verse tiny">2:1</span>"#
    ));
    assert!(result.html.contains("split extra"));
    // Entries that agree with the row label carry no extra number.
    assert_eq!(result.html.matches("verse tiny").count(), 1);
}

#[test]
fn collapsed_rows_keep_the_earlier_verse() {
    let service = divergent_service();
    let result = service
        .lookup(&PassageRequest {
            extra_versions: Some("SPL".to_owned()),
            display_mode: Some("INTERLEAVED_BY_VERSE".to_owned()),
            options: Some("VERSE_NUMBERS".to_owned()),
            ..request("MRG", "Ps")
        })
        .unwrap();

    // Split Ps 2:1 and 2:2 both collapse onto one merged row; the earlier
    // verse keeps it and the later one is not rendered.
    assert!(result.html.contains("split extra"));
    assert!(!result.html.contains("split surplus"));
    assert_eq!(result.html.matches("verse-group").count(), 3);
}

#[test]
fn interlinear_glosses_align_by_word_id() {
    let service = service();
    let result = service
        .lookup(&PassageRequest {
            extra_versions: Some("ILX".to_owned()),
            display_mode: Some("INTERLINEAR".to_owned()),
            options: Some("VERSE_NUMBERS".to_owned()),
            ..request("KJV", "Gen 1:1")
        })
        .unwrap();

    // "beginning" is word 3 in KJV Gen 1:1; the gloss module maps it to
    // "bara"'s neighbour "reshit" at word 2 and "bara" at 3.
    assert!(result.html.contains(r#"<span class="text">beginning</span><span class="gloss">bara</span>"#));
    assert!(result.html.contains(r#"<span class="gloss">reshit</span>"#));
}

#[test]
fn commentary_lookup_is_sparse() {
    let service = service();
    let result = service
        .lookup(&PassageRequest {
            options: Some("NOTES,CROSS_REFERENCES".to_owned()),
            ..request("TSK", "Gen 1")
        })
        .unwrap();

    // Only Gen 1:1 is covered; the rest of the chapter renders nothing.
    assert_eq!(result.html.matches("verse-block").count(), 1);
    assert!(result.html.contains(r#"<span class="note">"#));
    assert!(result.html.contains(r#"<a class="xref" data-osis="John.1.1">"#));
}

#[test]
fn ordinal_lookup_rounds_up_to_the_chapter() {
    let service = service();
    let start = service.key_info("KJV", "John 3:1", None).unwrap().start_ordinal;
    let result = service
        .lookup_by_ordinals(&OrdinalRequest {
            version: "KJV".to_owned(),
            start_ordinal: start,
            end_ordinal: start,
            rounding: Rounding::from_wire(Some("true")),
            options: Some("VERSE_NUMBERS".to_owned()),
            extra_versions: None,
        })
        .unwrap();

    assert_eq!(result.osis_id, "John.3");
    assert_eq!(result.end_ordinal - result.start_ordinal + 1, 3);
    assert_eq!(result.previous_chapter.as_ref().unwrap().osis_id, "John.2");
    assert!(result.next_chapter.is_none());
    assert!(result.html.contains("Nicodemus"));
}

#[test]
fn key_info_converts_between_versifications() {
    let service = service();
    // Psalm 2:2 does not exist in the lxx-aligned scheme; it collapses onto
    // the merged verse.
    let info = service.key_info("LXXE", "Ps 2:2", Some("KJV")).unwrap();
    assert_eq!(info.osis_id, "Ps.2.1");
    assert_eq!(info.versification.as_str(), "lxx-aligned");
    assert_eq!(info.start_ordinal, info.end_ordinal);
}

#[test]
fn navigation_and_expansion() {
    let service = service();
    let next = service.sibling_chapter("KJV", "John 1", Direction::Next).unwrap().unwrap();
    assert_eq!(next.osis_id, "John.2");
    assert_eq!(next.display_name, "John 2");

    let first = service.sibling_chapter("KJV", "Gen 1", Direction::Previous).unwrap();
    assert!(first.is_none());

    let chapter = service.expand_to_chapter("KJV", "John 3:2").unwrap();
    assert_eq!(chapter.osis_id, "John.3");
}

#[test]
fn available_features_intersect_all_modules() {
    let service = service();
    let available = service.available_features("WEB", Some("LXXE"), None).unwrap();
    assert_eq!(available, vec![Feature::VerseNumbers, Feature::Headings]);

    let alone = service.available_features("WEB", None, None).unwrap();
    assert!(alone.contains(&Feature::Strongs));
}

#[test]
fn plain_text_strips_markup() {
    let service = service();
    let text = service.plain_text("KJV", "Gen 1:3", false).unwrap();
    assert_eq!(text, "And God said, Let there be light: and there was light.");

    let first = service.plain_text("KJV", "Gen 1", true).unwrap();
    assert!(first.starts_with("In the beginning"));
    assert!(!first.contains("without form"));
}

#[test]
fn unknown_module_and_bad_reference_errors() {
    let service = service();
    let err = service.lookup(&request("NIV", "Gen 1:1")).unwrap_err();
    assert!(matches!(err, PassageError::ModuleNotFound { .. }));
    assert_eq!(err.code(), "MODULE_NOT_FOUND");

    let err = service.lookup(&request("KJV", "Gibberish 99")).unwrap_err();
    assert!(matches!(err, PassageError::NoSuchKey { .. }));
    assert_eq!(err.code(), "NO_SUCH_KEY");
}

#[test]
fn bad_extra_version_fails_the_whole_lookup() {
    let service = service();
    let err = service
        .lookup(&PassageRequest {
            extra_versions: Some("WEB,NIV".to_owned()),
            display_mode: Some("INTERLEAVED_BY_VERSE".to_owned()),
            ..request("KJV", "Gen 1:1")
        })
        .unwrap_err();
    assert!(matches!(err, PassageError::ModuleNotFound { .. }));
}

#[test]
fn versions_listing_filters_by_category() {
    use lectio_domain::modules::Category;
    let service = service();
    let bibles = service.versions(&[Category::Bible], None);
    assert!(bibles.iter().all(|m| m.category == Category::Bible));
    assert!(bibles.iter().any(|m| m.id.as_str() == "KJV"));

    let hebrew = service.versions(&[], Some("he"));
    assert_eq!(hebrew.len(), 1);
    assert_eq!(hebrew[0].id.as_str(), "ILX");
}

#[test]
fn continuous_mode_alternates_paragraphs() {
    let service = service();
    let result = service
        .lookup(&PassageRequest {
            extra_versions: Some("WEB".to_owned()),
            display_mode: Some("INTERLEAVED_CONTINUOUS".to_owned()),
            options: Some("TINY_VERSE_NUMBERS".to_owned()),
            ..request("KJV", "John 3:2-3")
        })
        .unwrap();
    let kjv = result.html.matches(r#"<p class="version" data-module="KJV">"#).count();
    let web = result.html.matches(r#"<p class="version" data-module="WEB">"#).count();
    assert_eq!(kjv, 2);
    assert_eq!(web, 2);
    assert!(result.html.find("KJV").unwrap() < result.html.find("WEB").unwrap());
}

#[test]
fn resolved_mode_matches_the_hint() {
    assert_eq!(DisplayMode::resolve(Some("COLUMN"), 1), DisplayMode::Column);
    assert_eq!(DisplayMode::resolve(Some("column"), 1), DisplayMode::Single);
}
