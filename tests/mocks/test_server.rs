//! Test server for integration tests

use axum::Router;
use polar_path::{BridgeApp, BridgeBuilder};
use tokio::task::JoinHandle;

/// Running API server plus the services behind it
pub struct TestServer {
	pub base_url: String,
	pub app: BridgeApp,
	pub handle: JoinHandle<()>,
}

#[allow(dead_code)]
impl TestServer {
	/// Start the builder and serve its router on an ephemeral port
	pub async fn spawn(builder: BridgeBuilder) -> Result<Self, Box<dyn std::error::Error>> {
		let app = builder.start().await?;
		let router: Router = app.router.clone();

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;
		let base_url = format!("http://{}:{}", addr.ip(), addr.port());

		let handle = tokio::spawn(async move {
			let _ = axum::serve(listener, router).await;
		});

		// Give server time to start
		tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

		Ok(Self {
			base_url,
			app,
			handle,
		})
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	pub fn abort(self) {
		self.handle.abort();
	}
}
