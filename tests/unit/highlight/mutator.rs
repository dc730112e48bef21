use super::*;
use crate::highlight::color::Palette;
use crate::highlight::config::HighlightConfig;
use crate::models::{Element, TextTree};

fn calculator() -> ColorLevelCalculator {
    ColorLevelCalculator::new(Palette::default(), &HighlightConfig::default())
}

fn spec(word: &str) -> MarkSpec<'_> {
    MarkSpec {
        word,
        mark_count: 1,
        base_color: "yellow",
        fallback_ambient: Rgb::BLACK,
    }
}

fn single(text: &str) -> (TextTree, NodeId, NodeId) {
    let mut tree = TextTree::new();
    let root = tree.root();
    let p = tree.append_element(root, Element::block("p")).unwrap();
    let t = tree.append_text(p, text).unwrap();
    (tree, p, t)
}

fn annotated_texts(tree: &TextTree, word: &str) -> Vec<String> {
    annotations_for(tree, tree.root(), word)
        .into_iter()
        .map(|node| tree.text_content(node))
        .collect()
}

#[test]
fn test_wrap_splits_segment_in_three() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, p, t) = single("This is a test sentence.");

    let wrapper = mutator.wrap(&mut tree, t, 10, 4, &spec("test")).unwrap();

    let children = tree.children(p).to_vec();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0], t);
    assert_eq!(children[1], wrapper);
    assert_eq!(tree.text(t), Some("This is a "));
    assert_eq!(tree.text_content(wrapper), "test");
    assert_eq!(tree.text(children[2]), Some(" sentence."));

    let mark = tree.mark(wrapper).unwrap();
    assert_eq!(mark.mark_count, 1);
    assert_eq!(mark.style.level, 1);
    assert!(mark.style.dark_context);
}

#[test]
fn test_wrap_at_segment_edges() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, p, t) = single("test");

    let wrapper = mutator.wrap(&mut tree, t, 0, 4, &spec("test")).unwrap();

    assert_eq!(tree.children(p), &[wrapper]);
    assert_eq!(tree.children(wrapper), &[t]);
}

#[test]
fn test_wrap_then_unwrap_restores_text() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, p, t) = single("This is a test sentence.");

    let wrapper = mutator.wrap(&mut tree, t, 10, 4, &spec("test")).unwrap();
    mutator.unwrap(&mut tree, wrapper).unwrap();
    tree.merge_text_siblings(p);

    assert_eq!(tree.children(p), &[t]);
    assert_eq!(tree.text(t), Some("This is a test sentence."));
}

#[test]
fn test_wrap_refuses_to_nest() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, _, t) = single("test");
    mutator.wrap(&mut tree, t, 0, 4, &spec("test")).unwrap();

    let err = mutator.wrap(&mut tree, t, 0, 2, &spec("te")).unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn test_wrap_rejects_bad_spans() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, _, t) = single("test");

    assert!(matches!(
        mutator.wrap(&mut tree, t, 0, 0, &spec("test")),
        Err(HighlightError::EmptyInput)
    ));
    assert!(matches!(
        mutator.wrap(&mut tree, t, 2, 5, &spec("test")),
        Err(HighlightError::Tree(TreeError::OffsetOutOfBounds { .. }))
    ));
}

#[test]
fn test_wrap_range_requires_single_segment() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, p, t) = single("one ");
    let other = tree.append_text(p, "two").unwrap();

    let range = TextRange::new(Position::new(t, 0), Position::new(other, 3));
    let err = mutator.wrap_range(&mut tree, &range, &spec("one")).unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn test_scan_respects_word_boundaries() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, _, _) = single("category cat concat cat.");
    let root = tree.root();

    let wrapped = mutator
        .scan_and_wrap(&mut tree, root, &spec("cat"), ScanPolicy::SkipExisting, None)
        .unwrap();

    assert_eq!(wrapped, 2);
    assert_eq!(annotated_texts(&tree, "cat"), vec!["cat", "cat"]);
    assert_eq!(tree.text_content(root), "category cat concat cat.");
}

#[test]
fn test_scan_is_case_insensitive() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, _, _) = single("Test and TEST and test");
    let root = tree.root();

    let wrapped = mutator
        .scan_and_wrap(&mut tree, root, &spec("test"), ScanPolicy::SkipExisting, None)
        .unwrap();

    assert_eq!(wrapped, 3);
    assert_eq!(annotated_texts(&tree, "test"), vec!["Test", "TEST", "test"]);
}

#[test]
fn test_scan_does_not_join_across_segments() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, p, _) = single("con");
    let b = tree.append_element(p, Element::inline("b")).unwrap();
    tree.append_text(b, "cat").unwrap();
    let root = tree.root();

    let wrapped = mutator
        .scan_and_wrap(&mut tree, root, &spec("cat"), ScanPolicy::SkipExisting, None)
        .unwrap();
    assert_eq!(wrapped, 0);
}

#[test]
fn test_scan_skip_existing_honors_reference() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, _, t) = single("test one test two test");
    let root = tree.root();

    mutator.wrap(&mut tree, t, 9, 4, &spec("test")).unwrap();
    let wrapped = mutator
        .scan_and_wrap(
            &mut tree,
            root,
            &spec("test"),
            ScanPolicy::SkipExisting,
            Some(Position::new(t, 9)),
        )
        .unwrap();

    assert_eq!(wrapped, 1);
    assert_eq!(annotations_for(&tree, root, "test").len(), 2);
    assert_eq!(tree.text(t), Some("test one "));

    let wrapped = mutator
        .scan_and_wrap(&mut tree, root, &spec("test"), ScanPolicy::ForceAll, None)
        .unwrap();
    assert_eq!(wrapped, 3);
    assert_eq!(annotations_for(&tree, root, "test").len(), 3);
    assert_eq!(tree.text_content(root), "test one test two test");
}

#[test]
fn test_scan_never_nests_into_other_words() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, _, t) = single("a big test here");
    let root = tree.root();
    mutator.wrap(&mut tree, t, 2, 8, &spec("big test")).unwrap();

    for policy in [ScanPolicy::SkipExisting, ScanPolicy::ForceAll] {
        let wrapped = mutator
            .scan_and_wrap(&mut tree, root, &spec("test"), policy, None)
            .unwrap();
        assert_eq!(wrapped, 0);
    }
    assert_eq!(annotations_for(&tree, root, "big test").len(), 1);
}

#[test]
fn test_scan_rejects_blank_word() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, _, _) = single("text");
    let root = tree.root();
    assert!(matches!(
        mutator.scan_and_wrap(&mut tree, root, &spec("  "), ScanPolicy::ForceAll, None),
        Err(HighlightError::EmptyInput)
    ));
}

#[test]
fn test_wrap_with_fallback_uses_ancestor_scan() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, p, _) = single("say ");
    let em = tree.append_element(p, Element::inline("em")).unwrap();
    let hi = tree.append_text(em, "hi").unwrap();
    let rest = tree.append_text(p, " there hi").unwrap();

    let range = TextRange::new(Position::new(hi, 0), Position::new(rest, 3));
    let outcome = mutator
        .wrap_with_fallback(&mut tree, &range, &spec("hi"))
        .unwrap();

    assert_eq!(
        outcome,
        WrapOutcome::Ancestor {
            container: p,
            wrapped: 2
        }
    );
}

#[test]
fn test_wrap_with_fallback_fails_without_occurrence() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, p, t) = single("one ");
    let other = tree.append_text(p, "two").unwrap();

    let range = TextRange::new(Position::new(t, 0), Position::new(other, 3));
    let err = mutator
        .wrap_with_fallback(&mut tree, &range, &spec("zzz"))
        .unwrap_err();
    assert!(err.is_structural());
}

#[test]
fn test_remove_empty_annotations() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, p, t) = single("  ");
    let kept = tree.append_text(p, "word").unwrap();
    let root = tree.root();

    let mark = Mark::new("x", 1, "yellow", calc.style_for("yellow", 1, Rgb::BLACK));
    tree.wrap(t, mark).unwrap();
    mutator.wrap(&mut tree, kept, 0, 4, &spec("word")).unwrap();

    assert_eq!(mutator.remove_empty(&mut tree, root), 1);
    assert_eq!(navigator::annotation_nodes(&tree, root).len(), 1);
}

#[test]
fn test_clear_annotations_in_range() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, p, t) = single("alpha beta gamma");
    let wrapper = mutator.wrap(&mut tree, t, 6, 4, &spec("beta")).unwrap();
    let beta = tree.children(wrapper)[0];
    let gamma = tree.children(p)[2];

    let mut miss = TextRange::within(t, 0, 3);
    assert_eq!(mutator.clear_annotations_in_range(&mut tree, &mut miss), 0);
    assert_eq!(miss, TextRange::within(t, 0, 3));

    let mut hit = TextRange::new(Position::new(beta, 2), Position::new(gamma, 3));
    assert_eq!(mutator.clear_annotations_in_range(&mut tree, &mut hit), 1);
    assert!(annotations_for(&tree, tree.root(), "beta").is_empty());

    // The split text is joined again and the range follows it.
    assert_eq!(tree.children(p), &[t]);
    assert_eq!(hit, TextRange::within(t, 8, 13));
    assert_eq!(hit.to_text(&tree), "ta ga");
}

#[test]
fn test_unwrap_word_merges_text() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, p, _) = single("cat and cat");
    let root = tree.root();
    mutator
        .scan_and_wrap(&mut tree, root, &spec("cat"), ScanPolicy::SkipExisting, None)
        .unwrap();

    assert_eq!(mutator.unwrap_word(&mut tree, root, "cat"), 2);
    assert_eq!(tree.children(p).len(), 1);
    assert_eq!(tree.text_content(p), "cat and cat");
    assert_eq!(mutator.unwrap_word(&mut tree, root, "cat"), 0);
}

#[test]
fn test_restyle_word_updates_every_annotation() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, _, _) = single("cat and cat");
    let root = tree.root();
    mutator
        .scan_and_wrap(&mut tree, root, &spec("cat"), ScanPolicy::SkipExisting, None)
        .unwrap();

    let restyle = MarkSpec {
        mark_count: 3,
        base_color: "blue",
        ..spec("cat")
    };
    assert_eq!(mutator.restyle_word(&mut tree, root, &restyle).unwrap(), 2);
    for node in annotations_for(&tree, root, "cat") {
        let mark = tree.mark(node).unwrap();
        assert_eq!(mark.mark_count, 3);
        assert_eq!(mark.base_color, "blue");
        assert_eq!(mark.style.level, 2);
    }

    assert!(matches!(
        mutator.restyle_word(&mut tree, root, &spec("dog")),
        Err(HighlightError::NotFound { .. })
    ));
}

#[test]
fn test_scan_matches_uppercase_word_ending_in_sigma() {
    let calc = calculator();
    let mutator = AnnotationMutator::new(&calc);
    let (mut tree, _, _) = single("ΟΔΟΣ one. ΟΔΟΣ two. οδος three.");
    let root = tree.root();

    let wrapped = mutator
        .scan_and_wrap(&mut tree, root, &spec("οδος"), ScanPolicy::SkipExisting, None)
        .unwrap();

    assert_eq!(wrapped, 3);
    assert_eq!(annotated_texts(&tree, "οδος"), vec!["ΟΔΟΣ", "ΟΔΟΣ", "οδος"]);
}
