//! End-to-end scenarios through the full engine: parse, detect,
//! correct, re-parse, report.

use rucop_rules::{diagnostics, run, Config, CopRegistry};

fn analyze(source: &str) -> rucop_rules::Analysis {
    run(source, &CopRegistry::default()).unwrap()
}

fn corrected(source: &str) -> String {
    analyze(source).source
}

#[test]
fn swapped_actions_are_reordered() {
    let source = "class UserController\n  def show; end\n  def index; end\nend\n";
    let analysis = analyze(source);

    assert_eq!(
        analysis.source,
        "class UserController\n  def index; end\n  def show; end\nend\n"
    );
    assert_eq!(analysis.offenses.len(), 1);
    assert_eq!(
        analysis.offenses[0].message,
        "Action index should appear before show."
    );
    assert!(analysis.offenses[0].corrected);
}

#[test]
fn ternary_with_nil_becomes_presence() {
    assert_eq!(corrected("a.present? ? a : nil\n"), "a.presence\n");
}

#[test]
fn ternary_with_alternative_keeps_it() {
    assert_eq!(corrected("a.present? ? a : b\n"), "a.presence || b\n");
}

#[test]
fn if_else_with_bare_call_gains_parens() {
    let source = "if value.present?\n  value\nelse\n  do_something value\nend\n";
    assert_eq!(corrected(source), "value.presence || do_something(value)\n");
}

#[test]
fn elsif_never_fires() {
    let source = "if a.present?\n a\nelsif b\n b\nend\n";
    let analysis = analyze(source);
    assert!(analysis.offenses.is_empty());
    assert_eq!(analysis.source, source);
}

#[test]
fn custom_order_reorders_only_ranked_names() {
    let yaml = "ActionOrder:\n  ExpectedOrder:\n    - index\n    - edit\n";
    let config = Config::from_yaml(yaml).unwrap();
    let registry = CopRegistry::with_config(&config);

    let source = "class UserController\n  def edit; end\n  def index\n    first\n  end\n  def show; end\n  def index\n    second\n  end\nend\n";
    let analysis = run(source, &registry).unwrap();

    // show has no rank and keeps its slot; the duplicate index
    // definitions keep their relative order to each other.
    assert_eq!(
        analysis.source,
        "class UserController\n  def index\n    first\n  end\n  def index\n    second\n  end\n  def show; end\n  def edit; end\nend\n"
    );
}

#[test]
fn methods_after_private_are_untouched() {
    let source = "class UserController\n  def index; end\n\n  private\n\n  def show; end\n  def index; end\nend\n";
    let analysis = analyze(source);
    assert!(analysis.offenses.is_empty());
    assert_eq!(analysis.source, source);
}

#[test]
fn corrected_output_reaches_a_fixed_point() {
    let source = "class UserController\n  def destroy\n    value.present? ? value : nil\n  end\n  def index; end\n  def show; end\nend\n";
    let analysis = analyze(source);

    let again = analyze(&analysis.source);
    assert!(again.offenses.is_empty());
    assert_eq!(again.source, analysis.source);
}

#[test]
fn both_cops_report_on_one_file() {
    let source = "class UserController\n  def show\n    @user = data.present? ? data : nil\n  end\n  def index; end\nend\n";
    let analysis = analyze(source);

    assert_eq!(analysis.offenses.len(), 2);
    assert!(analysis.offenses.iter().all(|o| o.corrected));
    assert!(analysis.source.contains("@user = data.presence"));

    let index_pos = analysis.source.find("def index").unwrap();
    let show_pos = analysis.source.find("def show").unwrap();
    assert!(index_pos < show_pos);
}

#[test]
fn diagnostics_report_original_positions() {
    let source = "class UserController\n  def show; end\n  def index; end\nend\n";
    let analysis = analyze(source);
    let diags = diagnostics("app/controllers/user_controller.rb", source, &analysis.offenses);

    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].cop_name, "rails/action_order");
    assert_eq!(diags[0].start_line, 3);
    assert_eq!(diags[0].start_column, 3);
    assert!(diags[0].corrected);
}

#[test]
fn unless_else_form_is_simplified() {
    let source = "unless a.present?\n  b\nelse\n  a\nend\n";
    assert_eq!(corrected(source), "a.presence || b\n");
}

#[test]
fn modifier_form_is_simplified() {
    assert_eq!(corrected("a if a.present?\n"), "a.presence\n");
}

#[test]
fn blank_with_inverted_branches_is_simplified() {
    assert_eq!(corrected("a.blank? ? nil : a\n"), "a.presence\n");
}

#[test]
fn multiline_chained_receiver_keeps_its_formatting() {
    let source = "if [1, 2, 3].map { |num| num + 1 }\n            .map { |num| num + 2 }\n            .present?\n  [1, 2, 3].map { |num| num + 1 }\n           .map { |num| num + 2 }\nelse\n  b\nend\n";
    assert_eq!(
        corrected(source),
        "[1, 2, 3].map { |num| num + 1 }\n            .map { |num| num + 2 }.presence || b\n"
    );
}
