use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = acris_api::Args::parse();

	acris_api::run(args).await
}
