pub mod analysis;
pub mod graph;
pub mod inventory;
pub mod report;

pub use analysis::{Adjacency, analyze_infrastructure, fan_in};
pub use graph::{Edge, GraphData, MalformedInputError, NodeKind, build_graph};
pub use inventory::{
    DiscoveryProgress, InventoryError, build_report, execute_discovery, run_inventory,
};
pub use report::{InventoryReport, ReportFormat, ReportSection};

const BANNER: &str = r#"
       __
  ___ / /____ ____ _  ___ ____
 (_-</  '_/ // /  ' \/ _ `/ _ \
/___/_/\_\\_, /_/_/_/\_,_/ .__/
         /___/          /_/
"#;

pub fn print_banner() {
    eprintln!("{}", BANNER);
    eprintln!(
        "  skymap v{} - cloud inventory and reference graph\n",
        env!("CARGO_PKG_VERSION")
    );
}
