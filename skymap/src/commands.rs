use clap::{arg, command};

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

const REPORT_FORMATS: [&str; 3] = ["json", "text", "dot"];

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("skymap")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("skymap")
        .about("Inventory a cloud account and map which resources reference each other")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Suppress banner and non-essential output")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .required(false)
                .action(clap::ArgAction::Count)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            command!("discover")
                .about(
                    "Enumerate the account through the AWS CLI, then build the reference graph \
                and adjacency report.",
                )
                .arg(
                    arg!(--"profile" <PROFILE>)
                        .required(false)
                        .help("AWS CLI profile to use (default: the CLI's own resolution)"),
                )
                .arg(
                    arg!(--"region" <REGION>)
                        .required(false)
                        .help("AWS region to query (default: the CLI's own resolution)"),
                )
                .arg(
                    arg!(--"aws-bin" <PATH>)
                        .required(false)
                        .help("Path to the AWS CLI executable")
                        .default_value("aws"),
                )
                .arg(
                    arg!(--"snapshot" <PATH>)
                        .required(false)
                        .help("Also save the raw discovery dataset, for later use with `analyze`"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: print to stdout)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: json, text, dot")
                        .value_parser(REPORT_FORMATS)
                        .default_value("json"),
                ),
        )
        .subcommand(
            command!("analyze")
                .about(
                    "Build the reference graph and adjacency report from a saved discovery \
                dataset or a previous JSON report.",
                )
                .arg(
                    arg!(<SNAPSHOT>)
                        .required(true)
                        .help("Path to the saved dataset or report"),
                )
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Save report to file (default: print to stdout)"),
                )
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Report format: json, text, dot")
                        .value_parser(REPORT_FORMATS)
                        .default_value("json"),
                ),
        )
}
