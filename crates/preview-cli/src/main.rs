use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use preview_cli::commands::{self, RequestArgs};
use preview_cli::{parse_mode_override, LogFormat, PreviewConfig};
use preview_mock::{ListShape, Method, MockMode, OperationKey};
use preview_spec::Role;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

fn cli() -> Command {
    Command::new("ui-preview")
        .version(preview_cli::VERSION)
        .about("Spec-driven screen preview with a scenario-controlled mock backend")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("public-dir")
                .long("public-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Static asset root; specs are read from <public-dir>/spec"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the mock backend over HTTP")
                .arg(
                    Arg::new("addr")
                        .long("addr")
                        .value_parser(value_parser!(SocketAddr))
                        .help("Listen address (default 127.0.0.1:4010)"),
                )
                .arg(
                    Arg::new("delay-ms")
                        .long("delay-ms")
                        .value_parser(value_parser!(u64))
                        .help("Interval applied by the delay mode"),
                )
                .arg(
                    Arg::new("list-shape")
                        .long("list-shape")
                        .value_parser(["users", "items"])
                        .help("Top-level key of the user listing"),
                )
                .arg(role_arg("Role active at start and after reset")),
        )
        .subcommand(
            Command::new("validate")
                .about("Load and validate a spec document")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .help("Spec file, or a public path such as /spec/user-list.screen.json"),
                ),
        )
        .subcommand(
            Command::new("tree")
                .about("Print the navigation tree")
                .arg(
                    Arg::new("parent")
                        .long("parent")
                        .help("Only list the children of this node"),
                ),
        )
        .subcommand(
            Command::new("request")
                .about("Issue one API request")
                .arg(
                    Arg::new("method")
                        .required(true)
                        .value_parser(["GET", "POST", "PUT", "DELETE", "get", "post", "put", "delete"])
                        .help("Request method"),
                )
                .arg(Arg::new("url").required(true).help("Path plus query string"))
                .arg(Arg::new("body").long("body").help("JSON request body"))
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .action(ArgAction::Append)
                        .value_parser(parse_mode_override)
                        .help("Scenario override, e.g. GET_USERS=serverError (repeatable)"),
                )
                .arg(role_arg("Role to act as"))
                .arg(
                    Arg::new("base-url")
                        .long("base-url")
                        .help("Target a running server instead of an in-process one"),
                )
                .arg(
                    Arg::new("timeout-ms")
                        .long("timeout-ms")
                        .value_parser(value_parser!(u64))
                        .help("Client ceiling per request"),
                )
                .arg(
                    Arg::new("log")
                        .long("log")
                        .action(ArgAction::SetTrue)
                        .help("Print the activity log"),
                ),
        )
        .subcommand(
            Command::new("preview")
                .about("Render a screen's table as a given role")
                .arg(
                    Arg::new("spec")
                        .long("spec")
                        .default_value("/spec/user-list.screen.json")
                        .help("Spec file or public path"),
                )
                .arg(role_arg("Role to view as"))
                .arg(Arg::new("search").long("search").help("Search text")),
        )
}

fn role_arg(help: &'static str) -> Arg {
    Arg::new("role")
        .long("role")
        .value_parser(["admin", "user", "guest"])
        .help(help)
}

fn role_of(args: &ArgMatches) -> anyhow::Result<Option<Role>> {
    args.get_one::<String>("role")
        .map(|raw| raw.parse::<Role>())
        .transpose()
        .context("parsing --role")
}

fn base_config(matches: &ArgMatches) -> anyhow::Result<PreviewConfig> {
    let path = matches.get_one::<PathBuf>("config");
    let mut config = PreviewConfig::load_or_default(path.map(PathBuf::as_path))?;
    if let Some(dir) = matches.get_one::<PathBuf>("public-dir") {
        config = config.with_public_dir(dir.clone());
    }
    Ok(config)
}

async fn run(matches: ArgMatches) -> anyhow::Result<()> {
    let mut config = base_config(&matches)?;
    let mut stdout = std::io::stdout().lock();

    match matches.subcommand() {
        Some(("serve", args)) => {
            if let Some(addr) = args.get_one::<SocketAddr>("addr") {
                config = config.with_addr(*addr);
            }
            if let Some(ms) = args.get_one::<u64>("delay-ms") {
                config.mock = config.mock.with_delay(Duration::from_millis(*ms));
            }
            if let Some(shape) = args.get_one::<String>("list-shape") {
                let shape = match shape.as_str() {
                    "items" => ListShape::Items,
                    _ => ListShape::Users,
                };
                config.mock = config.mock.with_list_shape(shape);
            }
            if let Some(role) = role_of(args)? {
                config.mock = config.mock.with_initial_role(role);
            }
            drop(stdout);
            commands::serve(&config).await
        }
        Some(("validate", args)) => {
            let path = args
                .get_one::<String>("path")
                .context("missing spec path")?;
            commands::validate(&config, path, &mut stdout).await.map(|_| ())
        }
        Some(("tree", args)) => {
            let parent = args.get_one::<String>("parent").map(String::as_str);
            commands::tree(parent, &mut stdout)
        }
        Some(("request", args)) => {
            let method = args
                .get_one::<String>("method")
                .context("missing method")?
                .parse::<Method>()
                .map_err(anyhow::Error::msg)?;
            let url = args.get_one::<String>("url").context("missing url")?;
            if let Some(ms) = args.get_one::<u64>("timeout-ms") {
                config.client = config.client.with_timeout(Duration::from_millis(*ms));
            }

            let mut request = RequestArgs::new(method, url.as_str());
            request.body = args
                .get_one::<String>("body")
                .map(|raw| serde_json::from_str(raw))
                .transpose()
                .context("--body is not valid JSON")?;
            request.modes = args
                .get_many::<(OperationKey, MockMode)>("mode")
                .map(|modes| modes.cloned().collect())
                .unwrap_or_default();
            request.role = role_of(args)?;
            request.base_url = args.get_one::<String>("base-url").cloned();
            request.show_log = args.get_flag("log");

            commands::request(&config, &request, &mut stdout).await.map(|_| ())
        }
        Some(("preview", args)) => {
            let spec = args
                .get_one::<String>("spec")
                .context("missing spec path")?;
            let role = role_of(args)?.unwrap_or(config.mock.initial_role);
            let search = args.get_one::<String>("search").map(String::as_str);
            commands::preview(&config, spec, role, search, &mut stdout).await
        }
        Some((other, _)) => anyhow::bail!("unknown command {other}"),
        None => anyhow::bail!("no command given"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    let format = if matches.get_flag("json-logs") {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    preview_cli::logging::init(format, "info");

    match run(matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        cli().debug_assert();
    }

    #[test]
    fn request_collects_repeated_modes() {
        let matches = cli()
            .try_get_matches_from([
                "ui-preview",
                "request",
                "GET",
                "/api/users",
                "--mode",
                "GET_USERS=delay",
                "--mode",
                "POST_USER=forbidden",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let modes: Vec<_> = args
            .get_many::<(OperationKey, MockMode)>("mode")
            .unwrap()
            .cloned()
            .collect();
        assert_eq!(modes.len(), 2);
        assert_eq!(modes[1], (OperationKey::POST_USER, MockMode::Forbidden));
    }

    #[test]
    fn unknown_mode_is_rejected_by_parser() {
        let result = cli().try_get_matches_from([
            "ui-preview",
            "request",
            "GET",
            "/api/users",
            "--mode",
            "GET_USERS=sometimes",
        ]);
        assert!(result.is_err());
    }
}
