//! Help marker shown next to a widget label

use crate::view::RenderNode;

/// Tooltip marker carrying `description`; `None` when there is nothing to say
pub fn render_description(description: Option<&str>) -> Option<RenderNode> {
    let text = description.map(str::trim).filter(|s| !s.is_empty())?;
    Some(
        RenderNode::new("Tooltip")
            .prop("title", text)
            .prop("placement", "right")
            .child(
                RenderNode::new("Icon")
                    .prop("baseClassName", "material-icons-outlined")
                    .style("font-size", "1em")
                    .style("margin-left", "0.3em")
                    .style("opacity", "0.6")
                    .text("help_outline"),
            ),
    )
}

/// `label` followed by the help marker, when there is a description
pub fn label_with_description(label: &str, description: Option<&str>) -> RenderNode {
    match render_description(description) {
        Some(marker) => RenderNode::new("fragment")
            .child(RenderNode::text_node(label))
            .child(marker),
        None => RenderNode::text_node(label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_description_renders_nothing() {
        assert!(render_description(None).is_none());
        assert!(render_description(Some("  ")).is_none());
        assert_eq!(label_with_description("Dark mode", None).text.as_deref(), Some("Dark mode"));
    }

    #[test]
    fn test_marker_carries_text() {
        let node = label_with_description("Dark mode", Some("Use the dark palette"));
        let tooltip = node.find("Tooltip").unwrap();
        assert_eq!(tooltip.get_prop("title").and_then(|v| v.as_str()), Some("Use the dark palette"));
    }
}
