use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ProviderName;

/// What main should do once arguments are handled.
pub enum Launch {
    Chat,
    Serve,
    Exit,
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

fn hotkeys_text() -> String {
    let text = r#"
HOTKEYS:
- Enter - Send the message.
- Up arrow - Scroll up.
- Down arrow - Scroll down.
- CTRL+U - Page up.
- CTRL+D - Page down.
- CTRL+C - Exit.
        "#;

    return text.trim().to_string();
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if !config_file_path.parent().unwrap().exists() {
        fs::create_dir_all(config_file_path.parent().unwrap()).await?;
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    let config_path_display = config_file_path.as_os_str().to_str().unwrap();
    println!("Created default config file at {config_path_display}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_chat() -> Command {
    return Command::new("chat")
        .about("Start a chat session in the terminal. This is the default when no subcommand is given.");
}

fn subcommand_serve() -> Command {
    return Command::new("serve").about(
        "Run the token issuance service, which exchanges the provider secret for a fresh conversation and short-lived token at GET /api/create.",
    );
}

pub fn build() -> Command {
    let hotkeys = hotkeys_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("HOTKEYS:") {
                return Paint::new(format!("CHAT {line}"))
                    .underline()
                    .bold()
                    .to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    return Command::new("confab")
        .about(about)
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(hotkeys)
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_serve())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("CONFAB_CONFIG_FILE")
                .num_args(1)
                .help(format!(
                    "Path to configuration file [default: {}]",
                    Config::default(ConfigKey::ConfigFile)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Provider.to_string())
                .short('p')
                .long(ConfigKey::Provider.to_string())
                .env("CONFAB_PROVIDER")
                .num_args(1)
                .help(format!(
                    "The conversation provider to exchange turns with. [default: {}]",
                    Config::default(ConfigKey::Provider)
                ))
                .value_parser(PossibleValuesParser::new(ProviderName::VARIANTS))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ApiUrl.to_string())
                .long(ConfigKey::ApiUrl.to_string())
                .env("CONFAB_API_URL")
                .num_args(1)
                .help(format!(
                    "Provider API URL. Can be swapped to a compatible proxy. [default: {}]",
                    Config::default(ConfigKey::ApiUrl)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::IssuerUrl.to_string())
                .long(ConfigKey::IssuerUrl.to_string())
                .env("CONFAB_ISSUER_URL")
                .num_args(1)
                .help(format!(
                    "Base URL of the token issuance service the chat view requests credentials from. [default: {}]",
                    Config::default(ConfigKey::IssuerUrl)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Model.to_string())
                .short('m')
                .long(ConfigKey::Model.to_string())
                .env("CONFAB_MODEL")
                .num_args(1)
                .help(format!(
                    "The provider model new conversations are created with. [default: {}]",
                    Config::default(ConfigKey::Model)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Backstory.to_string())
                .long(ConfigKey::Backstory.to_string())
                .env("CONFAB_BACKSTORY")
                .num_args(1)
                .help("Persona and instructions new conversations are created with.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Secret.to_string())
                .long(ConfigKey::Secret.to_string())
                .env("CONFAB_SECRET")
                .num_args(1)
                .help("Long-lived provider API secret, used only by the token issuance service and never shared with chat clients.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ListenAddress.to_string())
                .long(ConfigKey::ListenAddress.to_string())
                .env("CONFAB_LISTEN_ADDRESS")
                .num_args(1)
                .help(format!(
                    "Address the token issuance service binds to. [default: {}]",
                    Config::default(ConfigKey::ListenAddress)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Company.to_string())
                .long(ConfigKey::Company.to_string())
                .env("CONFAB_COMPANY")
                .num_args(1)
                .help("Optional company tag stamped on the first message of a session.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Campaign.to_string())
                .long(ConfigKey::Campaign.to_string())
                .env("CONFAB_CAMPAIGN")
                .num_args(1)
                .help("Optional campaign tag stamped on the first message of a session.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Greeting.to_string())
                .long(ConfigKey::Greeting.to_string())
                .env("CONFAB_GREETING")
                .num_args(1)
                .help(format!(
                    "Greeting shown before the first turn. [default: {}]",
                    Config::default(ConfigKey::Greeting)
                ))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::BotName.to_string())
                .long(ConfigKey::BotName.to_string())
                .env("CONFAB_BOT_NAME")
                .num_args(1)
                .help(format!(
                    "Display name on bot chat bubbles. [default: {}]",
                    Config::default(ConfigKey::BotName)
                ))
                .global(true),
        );
}

pub async fn parse() -> Result<Launch> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("serve", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            if Config::get(ConfigKey::Secret).is_empty() {
                bail!("No provider secret configured. Set --secret or CONFAB_SECRET before starting the token issuance service.");
            }
            return Ok(Launch::Serve);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
            return Ok(Launch::Exit);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(Launch::Exit);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(Launch::Exit);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(Launch::Exit);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(Launch::Exit);
            }
        },
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(Launch::Chat);
}
