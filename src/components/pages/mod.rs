//! Pages and the page-level pieces around the chapter graph.

mod desktop;
mod graph_page;
mod home;
mod mobile;
mod share_story;
mod success_alert;
mod title;

pub use desktop::GraphDesktopRender;
pub use graph_page::GraphPage;
pub use home::HomePage;
pub use mobile::GraphMobileRender;
pub use share_story::ShareStory;
pub use success_alert::SuccessAlert;
pub use title::OnchainChronicles;

/// Footer logo asset, served next to the wasm bundle.
const FOOTER_LOGO_SRC: &str = "/assets/foot_logo.svg";
