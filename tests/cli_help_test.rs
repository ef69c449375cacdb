#[cfg(test)]
mod cli_help_tests {
    use assert_cmd::prelude::*;
    use std::process::Command;

    #[test]
    fn test_cli_help_output() {
        let mut cmd = Command::cargo_bin("qbank").unwrap();

        let assert_result = cmd.arg("--help").assert().success();
        let output = assert_result.get_output();
        let help_output = String::from_utf8_lossy(&output.stdout);

        assert!(help_output.contains("Usage:"));
        assert!(help_output.contains("Options:"));
        assert!(help_output.contains("Commands:"));

        assert!(help_output.contains("folder"));
        assert!(help_output.contains("config"));

        assert!(help_output.contains("-h, --help"));
        assert!(help_output.contains("-V, --version"));
        assert!(help_output.contains("-v, --verbose"));
        assert!(help_output.contains("qbank"));
    }

    #[test]
    fn test_cli_subcommand_help_outputs() {
        let subcommands = vec![
            ("folder", vec!["list", "tree", "get", "create", "rename", "delete", "add-object", "remove-object"]),
            ("config", vec!["get", "show", "set"]),
        ];

        for (subcommand, expected) in subcommands {
            let mut cmd = Command::cargo_bin("qbank").unwrap();
            let assert_result = cmd.arg(subcommand).arg("--help").assert().success();
            let output = assert_result.get_output();
            let help_output = String::from_utf8_lossy(&output.stdout);

            assert!(help_output.contains("Usage:"));
            assert!(help_output.contains(subcommand));
            for name in expected {
                assert!(
                    help_output.contains(name),
                    "help of {} does not mention {}",
                    subcommand,
                    name
                );
            }
        }
    }

    #[test]
    fn test_cli_version_output() {
        let mut cmd = Command::cargo_bin("qbank").unwrap();

        let assert_result = cmd.arg("--version").assert().success();
        let output = assert_result.get_output();
        let version_output = String::from_utf8_lossy(&output.stdout);

        assert!(version_output.contains("qbank"));
        assert!(version_output.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_nested_subcommand_help() {
        let nested_commands = vec![
            ("folder", "list", "--depth"),
            ("folder", "tree", "--format"),
            ("folder", "get", "--recursive"),
            ("folder", "create", "--parent-folder-id"),
            ("folder", "rename", "--name"),
            ("folder", "delete", "--folder-id"),
            ("config", "show", "--pretty"),
            ("config", "set", "--session-hash"),
        ];

        for (parent_cmd, sub_cmd, option) in nested_commands {
            let mut cmd = Command::cargo_bin("qbank").unwrap();
            let assert_result = cmd
                .arg(parent_cmd)
                .arg(sub_cmd)
                .arg("--help")
                .assert()
                .success();
            let output = assert_result.get_output();
            let help_output = String::from_utf8_lossy(&output.stdout);

            assert!(help_output.contains("Usage:"));
            assert!(help_output.contains(parent_cmd));
            assert!(help_output.contains(sub_cmd));
            assert!(help_output.contains(option));
        }
    }

    #[test]
    fn test_missing_subcommand_is_a_usage_error() {
        let mut cmd = Command::cargo_bin("qbank").unwrap();
        cmd.arg("folder").assert().failure().code(2);
    }
}
