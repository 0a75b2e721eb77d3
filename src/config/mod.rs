//! Configuration module

mod site;

pub use site::AboutConfig;
pub use site::AuthorConfig;
pub use site::BlogConfig;
pub use site::FeedConfig;
pub use site::HighlightConfig;
pub use site::NavItem;
pub use site::RobotsConfig;
pub use site::RobotsRule;
pub use site::ServerConfig;
pub use site::SiteConfig;
pub use site::SitemapConfig;
pub use site::SitemapPage;
pub use site::SocialConfig;
pub use site::Talk;
pub use site::TechnicalConfig;
pub use site::Topic;
