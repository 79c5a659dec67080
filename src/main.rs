mod cli;
mod client;
mod config;
mod error;
mod feed;
mod html;
mod i18n;
mod mapper;
mod render;
mod store;
mod surface;
mod util;
mod ux;
mod widget;

#[cfg(test)]
mod test_utils;

use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
  // stdout carries the rendered page
  tracing_subscriber::fmt().with_writer(std::io::stderr).init();

  let cli = cli::Cli::parse();
  cli.run().await?;
  Ok(())
}
