// Sidebar navigation domain model
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub name: &'static str,
    pub href: &'static str,
}

pub const NAV_ITEMS: [NavItem; 4] = [
    NavItem { name: "Home", href: "/" },
    NavItem { name: "Discover", href: "/discover" },
    NavItem { name: "Settings", href: "/settings" },
    NavItem { name: "Library", href: "/library" },
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarState {
    pub is_collapsed: bool,
}

impl SidebarState {
    pub fn toggle(&mut self) {
        self.is_collapsed = !self.is_collapsed;
    }

    pub fn collapse(&mut self) {
        self.is_collapsed = true;
    }
}
