use anyhow::{anyhow, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use menu_core::{MenuConfig, MenuSession};
use menu_model::{CategoryId, DiscountConfig, MenuTemplate, NavbarStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("menu-admin")
        .version(menu_core::VERSION)
        .about("Inspect and edit stored menu data")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .default_value("menu.toml")
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file"),
        )
        .subcommand(Command::new("status").about("Show storage health and metadata"))
        .subcommand(
            Command::new("show")
                .about("Print categories and items with effective prices")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export stored data as pretty JSON")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .short('o')
                        .value_parser(value_parser!(PathBuf))
                        .help("Write to file instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Validate and store a previously exported file")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("clear").about("Delete stored data from every medium"))
        .subcommand(
            Command::new("navbar")
                .about("Set navbar style")
                .arg(
                    Arg::new("style")
                        .required(true)
                        .value_parser(["text-only", "icon-only", "icon-with-text"]),
                ),
        )
        .subcommand(
            Command::new("template")
                .about("Set item card template")
                .arg(
                    Arg::new("name")
                        .required(true)
                        .value_parser(["default", "compact", "square"]),
                ),
        )
        .subcommand(
            Command::new("discount")
                .about("Set a category discount (desserts uses the desserts discount)")
                .arg(Arg::new("category").required(true))
                .arg(
                    Arg::new("percent")
                        .required(true)
                        .value_parser(value_parser!(u8).range(0..=100)),
                )
                .arg(
                    Arg::new("off")
                        .long("off")
                        .action(ArgAction::SetTrue)
                        .help("Keep the percentage but deactivate the discount"),
                ),
        )
}

fn arg<'a, T: Clone + Send + Sync + 'static>(args: &'a ArgMatches, name: &str) -> Result<&'a T> {
    args.get_one::<T>(name)
        .ok_or_else(|| anyhow!("missing argument <{name}>"))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config_path = arg::<PathBuf>(&matches, "config")?;
    let config = MenuConfig::load(config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let session = MenuSession::open(config).await?;

    match matches.subcommand() {
        Some(("status", _)) => {
            println!("{}", session.status().await);
        }
        Some(("show", args)) => {
            if args.get_flag("json") {
                println!("{}", serde_json::to_string_pretty(&session.menu().current())?);
            } else {
                print_menu(&session);
            }
        }
        Some(("export", args)) => {
            let text = session.export()?;
            match args.get_one::<PathBuf>("out") {
                Some(path) => {
                    std::fs::write(path, text)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("exported to {}", path.display());
                }
                None => println!("{text}"),
            }
        }
        Some(("import", args)) => {
            let path = arg::<PathBuf>(args, "file")?;
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let receipt = session.import(&text).await?;
            println!("imported into {} at {}", receipt.medium, receipt.saved_at.to_rfc3339());
            report_degraded(&receipt);
        }
        Some(("clear", _)) => {
            let receipt = session.clear().await?;
            println!("cleared {}", receipt.medium);
            report_degraded(&receipt);
        }
        Some(("navbar", args)) => {
            let style: NavbarStyle = arg::<String>(args, "style")?.parse()?;
            session.menu().set_navbar_style(style);
            commit(&session).await?;
        }
        Some(("template", args)) => {
            let template: MenuTemplate = arg::<String>(args, "name")?.parse()?;
            session.menu().set_template(template);
            commit(&session).await?;
        }
        Some(("discount", args)) => {
            let category = CategoryId::new(arg::<String>(args, "category")?.as_str());
            let discount = DiscountConfig {
                percentage: *arg::<u8>(args, "percent")?,
                active: !args.get_flag("off"),
            };
            if category.is_desserts() {
                session.menu().set_desserts_discount(discount)?;
            } else {
                session.menu().set_category_discount(&category, Some(discount))?;
            }
            commit(&session).await?;
        }
        _ => unreachable!("subcommand_required"),
    }

    session.shutdown();
    Ok(())
}

async fn commit(session: &MenuSession) -> Result<()> {
    for receipt in session.confirm_all().await? {
        println!("saved to {} at {}", receipt.medium, receipt.saved_at.to_rfc3339());
        report_degraded(&receipt);
    }
    Ok(())
}

fn report_degraded(receipt: &menu_storage::StorageReceipt) {
    for failure in &receipt.degraded {
        eprintln!("warning: {failure}");
    }
}

fn print_menu(session: &MenuSession) {
    let menu = session.menu().current();
    println!(
        "navbar: {:?}  template: {:?}",
        menu.navbar_style, menu.selected_template
    );
    for category in &menu.categories {
        println!();
        println!("{} [{}]", category.name, category.id);
        for item in menu.items_in(&category.id) {
            let price = menu.effective_price(item);
            if (price - item.price).abs() > f64::EPSILON {
                println!("  #{:<4} {:<32} {:>8.2} (was {:.2})", item.id, item.title, price, item.price);
            } else {
                println!("  #{:<4} {:<32} {:>8.2}", item.id, item.title, price);
            }
        }
    }
}
