//! Context menu for the system tray.

use tray_icon::menu::{Menu, MenuId, MenuItem, PredefinedMenuItem};

pub const MENU_ID_CAPTURE: &str = "capture";
pub const MENU_ID_RELEASE: &str = "release";
pub const MENU_ID_EXIT: &str = "exit";

/// Creates the context menu for the system tray.
pub fn create_tray_menu() -> Menu {
    let menu = Menu::new();

    let capture = MenuItem::with_id(
        MenuId::new(MENU_ID_CAPTURE),
        "Capture volume keys",
        true,
        None,
    );
    let release = MenuItem::with_id(
        MenuId::new(MENU_ID_RELEASE),
        "Release volume keys",
        true,
        None,
    );
    let separator = PredefinedMenuItem::separator();
    let exit = MenuItem::with_id(MenuId::new(MENU_ID_EXIT), "Exit", true, None);

    let _ = menu.append(&capture);
    let _ = menu.append(&release);
    let _ = menu.append(&separator);
    let _ = menu.append(&exit);

    menu
}
