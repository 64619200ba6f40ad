use crate::cli::Commands;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

pub fn mode_for_command(command: &Commands) -> OutputMode {
    if command.json() {
        OutputMode::Json
    } else {
        OutputMode::Text
    }
}

#[cfg(test)]
mod tests {
    use super::{OutputMode, mode_for_command};
    use crate::cli::parse_from;

    #[test]
    fn json_flag_selects_json_for_every_command() {
        let cases: [&[&str]; 7] = [
            &["fishkey", "parse", "COD", "--json"],
            &["fishkey", "key", "COD", "--json"],
            &["fishkey", "match", "COD", "COD", "--json"],
            &["fishkey", "find", "COD", "--candidates", "-", "--json"],
            &["fishkey", "batch", "-", "--json"],
            &["fishkey", "codes", "--json"],
            &["fishkey", "species", "--json"],
        ];
        for case in cases {
            let parsed = parse_from(case);
            assert!(parsed.is_ok());
            if let Ok(cli) = parsed {
                assert_eq!(mode_for_command(&cli.command), OutputMode::Json);
            }
        }
    }

    #[test]
    fn text_is_the_default() {
        let parsed = parse_from(["fishkey", "match", "COD", "COD"]);
        assert!(parsed.is_ok());
        if let Ok(cli) = parsed {
            assert_eq!(mode_for_command(&cli.command), OutputMode::Text);
        }
    }
}
