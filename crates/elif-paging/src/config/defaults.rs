//! Default configuration values

use crate::routes::RouteKind;

pub struct PagingDefaults;

impl PagingDefaults {
    pub const CONTAINER_CLASS: &'static str = "page fr";
    pub const BUTTON_CLASS: &'static str = "btt";
    pub const STEP_CLASS: &'static str = "bttb";
    pub const INERT_HREF: &'static str = "#";
    pub const DEFAULT_ROUTE: RouteKind = RouteKind::Show;
}
