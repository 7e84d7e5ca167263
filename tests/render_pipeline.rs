// End-to-end: format toggles on raw content, then render and highlight

use keepnotes::richtext::{
    FormatFlags, InlineFormat, Selection, apply_format, detect_formats, render_markers_to_markup,
};
use keepnotes::search::{highlight_markup, highlight_plain_text};
use keepnotes::view::render_note_body;

#[test]
fn bold_render_and_highlight() {
    let formatted = apply_format("hello world", Selection::new(0, 5), InlineFormat::Bold).unwrap();
    assert_eq!(formatted.content, "**hello** world");
    assert_eq!(formatted.selection, Selection::new(0, 9));

    let markup = render_markers_to_markup(&formatted.content);
    insta::assert_snapshot!(&markup, @r#"<span class="text-bold">hello</span> world"#);

    let highlighted = highlight_markup(&markup, "wor");
    insta::assert_snapshot!(
        highlighted,
        @r#"<span class="text-bold">hello</span> <mark class="search-highlight">wor</mark>ld"#
    );
}

#[test]
fn italic_on_bold_then_render() {
    let content = "a **big** deal";
    let formatted = apply_format(content, Selection::new(2, 9), InlineFormat::Italic).unwrap();
    assert_eq!(formatted.content, "a ***big*** deal");
    assert_eq!(
        detect_formats(&formatted.content, formatted.selection),
        FormatFlags {
            bold: true,
            italic: true,
            underline: false
        }
    );

    insta::assert_snapshot!(
        render_markers_to_markup(&formatted.content),
        @r#"a <span class="text-italic"><span class="text-bold">big</span></span> deal"#
    );
}

#[test]
fn underline_then_clear() {
    let content = "note to self";
    let underlined =
        apply_format(content, Selection::new(5, 12), InlineFormat::Underline).unwrap();
    assert_eq!(underlined.content, "note __to self__");

    let bolded = apply_format(
        &underlined.content,
        underlined.selection,
        InlineFormat::Bold,
    )
    .unwrap();
    assert_eq!(bolded.content, "note **__to self__**");
    assert!(bolded.formats.bold && bolded.formats.underline);

    let cleared = apply_format(&bolded.content, bolded.selection, InlineFormat::Clear).unwrap();
    assert_eq!(cleared.content, content);
    assert!(cleared.formats.is_plain());
}

#[test]
fn underline_across_bold_boundary_renders_nested() {
    let formatted =
        apply_format("**ab** cd", Selection::new(4, 9), InlineFormat::Underline).unwrap();
    insta::assert_snapshot!(
        render_markers_to_markup(&formatted.content),
        @r#"<span class="text-underline"><span class="text-bold">ab</span> cd</span>"#
    );

    let formatted = apply_format("**abc**", Selection::new(3, 4), InlineFormat::Underline).unwrap();
    insta::assert_snapshot!(
        render_markers_to_markup(&formatted.content),
        @r#"<span class="text-bold">a<span class="text-underline">b</span>c</span>"#
    );
}

#[test]
fn highlighting_is_idempotent_across_queries() {
    let body = render_note_body("The *cat* sat on the cat mat", "cat");
    insta::assert_snapshot!(
        body,
        @r#"The <span class="text-italic"><mark class="search-highlight">cat</mark></span> sat on the <mark class="search-highlight">cat</mark> mat"#
    );
    assert_eq!(highlight_markup(&body, "cat"), body);

    insta::assert_snapshot!(
        highlight_markup(&body, "MAT"),
        @r#"The <span class="text-italic">cat</span> sat on the cat <mark class="search-highlight">mat</mark>"#
    );
}

#[test]
fn accent_insensitive_title_highlight() {
    insta::assert_snapshot!(
        highlight_plain_text("Crème brûlée & Café", "CAFE"),
        @r#"Crème brûlée &amp; <mark class="search-highlight">Café</mark>"#
    );
}

#[test]
fn user_text_cannot_inject_markup() {
    let body = render_note_body(r#"<img src=x onerror="alert(1)"> **ok**"#, "img");
    insta::assert_snapshot!(
        body,
        @r#"&lt;<mark class="search-highlight">img</mark> src=x onerror=&quot;alert(1)&quot;&gt; <span class="text-bold">ok</span>"#
    );
}
