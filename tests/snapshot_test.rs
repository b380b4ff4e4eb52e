use pretty_assertions::assert_eq;

use mindmap::ast::NodePath;
use mindmap::{RenderOptions, render_svg};

#[test]
fn snapshot_single_node() {
    let output = render_svg("- Hi\n", &RenderOptions::default());
    let expected = r##"<svg xmlns="http://www.w3.org/2000/svg" width="108" height="110" viewBox="0 0 108 110">
<style>
  .label { font-family: sans-serif; font-size: 14px; dominant-baseline: middle; text-anchor: middle; }
  .connector { fill: none; stroke: #888; stroke-width: 1.5; }
  .border { fill: #fff; stroke: #333; stroke-width: 1; }
  .collapsed .border { stroke-dasharray: 4 2; }
</style>
<g transform="matrix(1 0 0 1 54 55)">
<g class="node" data-path="root">
<text class="label" x="0.00" y="0.00"><tspan x="0.00" dy="0em">Hi</tspan></text>
</g>
</g>
</svg>
"##;
    assert_eq!(output, expected);
}

#[test]
fn snapshot_connector_curve() {
    let output = render_svg("- Root\n  - A\n", &RenderOptions::default());
    assert!(output.contains(r#"width="272" height="110""#));
    assert!(output.contains("matrix(1 0 0 1 210 55)"));
    assert!(output.contains(
        r#"<path class="connector" d="M-22.00,0.00 C-86.00,0.00 -86.00,0.00 -150.00,0.00"/>"#
    ));
    let path = output.find("<path").unwrap();
    let first_node = output.find(r#"<g class="node""#).unwrap();
    assert!(path < first_node, "connectors are drawn beneath nodes");
}

#[test]
fn snapshot_rectangle_border() {
    let output = render_svg("config: rectangle\n- Hi\n", &RenderOptions::default());
    assert!(output.contains(
        r#"<rect class="border" x="-14.00" y="-15.00" width="28.00" height="30.00" rx="4"/>"#
    ));
}

#[test]
fn snapshot_ellipse_border() {
    let output = render_svg("config: ellipse\n- Hi\n", &RenderOptions::default());
    assert!(output.contains(r#"<ellipse class="border" cx="0.00" cy="0.00""#));
    assert!(!output.contains("<rect"));
}

#[test]
fn snapshot_multiline_label() {
    let output = render_svg("- One<br/>Two\n", &RenderOptions::default());
    assert!(output.contains(r#"dy="-0.6em">One</tspan>"#));
    assert!(output.contains(r#"dy="1.2em">Two</tspan>"#));
}

#[test]
fn snapshot_label_is_escaped() {
    let output = render_svg("- a < b & c\n", &RenderOptions::default());
    assert!(output.contains(">a &lt; b &amp; c</tspan>"));
}

#[test]
fn snapshot_collapsed_branch() {
    let options = RenderOptions {
        collapse: vec!["0".parse::<NodePath>().unwrap()],
        ..RenderOptions::default()
    };
    let output = render_svg("- R\n  - A\n    - A1\n  - B\n", &options);
    assert!(output.contains(r#"<g class="node collapsed" data-path="0">"#));
    assert!(!output.contains("A1"));
    assert_eq!(output.matches("<path").count(), 2);
}

#[test]
fn snapshot_placeholder_for_empty_outline() {
    let output = render_svg("   \n\n", &RenderOptions::default());
    assert!(output.contains(r#"<text class="label placeholder" x="0.00" y="0.00">invalid structure</text>"#));
}
