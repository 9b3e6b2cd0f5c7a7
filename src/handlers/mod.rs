// Generic list / show / update handlers, instantiated per resource in app.rs.
// Resource modules only contribute their update body rules.
pub mod menu_options;
pub mod menus;
pub mod resource;
