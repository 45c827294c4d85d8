use tasktalk::output::{format_human, HumanOutput};

#[test]
fn format_human_includes_sections() {
    let mut human = HumanOutput::new("tasktalk add: 1 item(s)");
    human.push_detail("Added: Buy Milk");
    human.push_warning("state file was unreadable and has been reset");

    let rendered = format_human(&human);
    assert!(rendered.starts_with("tasktalk add: 1 item(s)\n\nAdded: Buy Milk"));
    assert!(rendered.contains("Warnings:"));
    assert!(rendered.contains("- state file was unreadable and has been reset"));
}

#[test]
fn format_human_omits_empty_sections() {
    let human = HumanOutput::new("(no tasks)");
    let rendered = format_human(&human);
    assert_eq!(rendered, "(no tasks)");
}
