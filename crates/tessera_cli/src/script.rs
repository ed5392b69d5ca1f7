//! Interaction timelines for `tessera simulate`
//!
//! A script is a comma-separated list of `action@ms` steps, for example
//! `click@0,click@500,tick@1001`. `tick` only moves the clock; anything else
//! is an interaction in `name` or `name:arg` form.

use anyhow::{bail, Context, Result};
use std::time::Duration;
use tessera_widgets::Interaction;

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Tick,
    Interact(Interaction),
}

impl Action {
    pub fn label(&self) -> String {
        match self {
            Action::Tick => "tick".to_string(),
            Action::Interact(interaction) => match &interaction.arg {
                Some(arg) => format!("{}:{arg}", interaction.name),
                None => interaction.name.clone(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    pub at: Duration,
    pub action: Action,
}

/// Parse a script; step times must not go backwards
pub fn parse(script: &str) -> Result<Vec<Step>> {
    let mut steps: Vec<Step> = Vec::new();
    for raw in script.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (action, at) = raw
            .rsplit_once('@')
            .with_context(|| format!("step '{raw}' is missing '@<ms>'"))?;
        let ms: u64 = at
            .trim()
            .parse()
            .with_context(|| format!("step '{raw}' has an invalid time"))?;
        let at = Duration::from_millis(ms);

        if let Some(last) = steps.last() {
            if at < last.at {
                bail!(
                    "step '{raw}' at {ms}ms comes before the previous step at {}ms",
                    last.at.as_millis()
                );
            }
        }

        let action = match action.trim() {
            "" => bail!("step '{raw}' has no action"),
            "tick" => Action::Tick,
            other => Action::Interact(Interaction::parse(other)),
        };
        steps.push(Step { at, action });
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_timeline() {
        let steps = parse("click@0, click@500 ,tick@1001").unwrap();
        assert_eq!(steps.len(), 3);
        assert_eq!(steps[1].at, Duration::from_millis(500));
        assert_eq!(steps[2].action, Action::Tick);
        assert_eq!(steps[0].action.label(), "click");
    }

    #[test]
    fn test_parse_interaction_argument() {
        let steps = parse("select:2@10").unwrap();
        let Action::Interact(interaction) = &steps[0].action else {
            panic!("expected an interaction");
        };
        assert_eq!(interaction.name, "select");
        assert_eq!(interaction.arg, Some(json!(2)));
        assert_eq!(steps[0].action.label(), "select:2");
    }

    #[test]
    fn test_parse_rejects_bad_steps() {
        assert!(parse("click").is_err());
        assert!(parse("click@soon").is_err());
        assert!(parse("@5").is_err());
        assert!(parse("click@500,click@100").is_err());
        assert!(parse("").unwrap().is_empty());
    }
}
