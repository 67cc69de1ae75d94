/// Welcome and goodbye configuration, lookup and rendering
pub mod greeting;
/// Role messages and the buttons that toggle roles
pub mod role_manager;
/// Embed template storage and authoring operations
pub mod template;
/// Authoring-time checks for colors and URLs
pub mod validation;
