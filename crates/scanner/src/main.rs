use anyhow::Context;
use config::{Args, ScanConfig};
use sora_wallet_scan::{logging, report, scan::ScanSession, ss58};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse_args();
    let config = ScanConfig::load(&args.env_file)?;
    logging::init(&config.log.level)?;

    // Fail before the first query on a mistyped address.
    if !ss58::is_valid(&args.address, None) {
        anyhow::bail!("Address {} is not a valid SS58 address", args.address);
    }
    if let Some(eth_address) = &args.eth_address {
        if !config::is_eth_address(eth_address) {
            anyhow::bail!("Address {} is not a valid Ethereum address", eth_address);
        }
    }

    tracing::info!("Scanning wallet {}", args.address);
    tracing::info!("From height: {}", args.from_height);

    let session = ScanSession::new(
        config.clone(),
        &args.address,
        args.eth_address.clone(),
        args.from_height,
    );

    // The chains share no state; scan them concurrently.
    let (sora, eth) = tokio::join!(session.run_sora(), session.run_eth());
    let sora_rows = sora.context("SORA scan failed")?;
    let eth_rows = eth.context("Ethereum scan failed")?;

    if sora_rows.is_empty() && eth_rows.is_empty() {
        println!("No transactions for {}", args.address);
        return Ok(());
    }

    if !sora_rows.is_empty() {
        let path = report::report_path(
            &config.output_dir,
            "SORA",
            &args.address,
            args.from_height,
            &sora_rows,
        );
        report::write_report(&path, &sora_rows)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Statistics saved in {}", path.display());
    }

    if !eth_rows.is_empty() {
        let eth_wallet = args.eth_address.as_deref().unwrap_or(&args.address);
        let path = report::report_path(
            &config.output_dir,
            "ETH",
            eth_wallet,
            args.from_height,
            &eth_rows,
        );
        report::write_report(&path, &eth_rows)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Statistics saved in {}", path.display());
    }

    if !sora_rows.is_empty() && !eth_rows.is_empty() {
        let merged = report::merge(sora_rows, eth_rows);
        let path = report::report_path(
            &config.output_dir,
            "ALL",
            &args.address,
            args.from_height,
            &merged,
        );
        report::write_report(&path, &merged)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Combined statistics saved in {}", path.display());
    }

    Ok(())
}
