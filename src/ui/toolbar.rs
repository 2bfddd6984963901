use chrono::Local;
use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icon;

use crate::app::TimelineApp;
use crate::ui::theme;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TimelineApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button("  File  ", |ui| {
            if ui.button(format!("{}  New Plan", icon::FILE_PLUS)).clicked() {
                app.new_plan();
                ui.close_menu();
            }
            if ui.button(format!("{}  Open...", icon::FOLDER_OPEN)).clicked() {
                app.open_plan();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Save          Ctrl+S", icon::FLOPPY_DISK)).clicked() {
                app.save_plan();
                ui.close_menu();
            }
            if ui.button("     Save As...").clicked() {
                app.save_plan_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Import Calendar CSV...", icon::CALENDAR_PLUS)).clicked() {
                app.import_calendar();
                ui.close_menu();
            }
        });

        ui.menu_button("  View  ", |ui| {
            if ui
                .button(format!("{}  Zoom In        Ctrl+Scroll ↑", icon::MAGNIFYING_GLASS_PLUS))
                .clicked()
            {
                app.view.zoom_in();
                ui.close_menu();
            }
            if ui
                .button(format!("{}  Zoom Out      Ctrl+Scroll ↓", icon::MAGNIFYING_GLASS_MINUS))
                .clicked()
            {
                app.view.zoom_out();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Go to Today", icon::CROSSHAIR)).clicked() {
                app.jump_to_date(Local::now().date_naive());
                ui.close_menu();
            }
            ui.checkbox(&mut app.view.edit_mode, "Edit mode (select new ranges)");
            ui.separator();
            if ui.button(format!("{}  Open Settings Folder", icon::GEAR)).clicked() {
                app.open_config_folder();
                ui.close_menu();
            }
        });

        ui.menu_button("  Calendars  ", |ui| {
            if app.plan.calendars.is_empty() {
                ui.label(RichText::new("No calendars yet. Import one from File.").weak());
            }
            let calendars: Vec<_> = app
                .plan
                .calendars
                .iter()
                .map(|c| (c.id, c.name.clone(), c.days.len()))
                .collect();
            for (id, name, days) in calendars {
                let mut shown = app.plan.calendar_ids.contains(&id);
                if ui
                    .checkbox(&mut shown, format!("{} ({} days)", name, days))
                    .changed()
                {
                    app.toggle_calendar(id);
                }
            }
        });

        ui.separator();

        ui.label(RichText::new(icon::CALENDAR_BLANK).color(theme::TEXT_SECONDARY));
        let mut date = app.jump_date;
        if ui
            .add(egui_extras::DatePickerButton::new(&mut date).id_salt("toolbar_jump_date"))
            .changed()
        {
            app.jump_to_date(date);
        }
        if ui
            .button(RichText::new(format!("{} Go", icon::ARROW_RIGHT)).size(12.0))
            .on_hover_text("Scroll the timeline to this date")
            .clicked()
        {
            app.jump_to_date(app.jump_date);
        }

        let edit_label = format!("{} Edit", icon::PENCIL_SIMPLE);
        let edit_text = if app.view.edit_mode {
            RichText::new(edit_label).color(theme::ACCENT)
        } else {
            RichText::new(edit_label)
        };
        if ui.selectable_label(app.view.edit_mode, edit_text).clicked() {
            app.view.edit_mode = !app.view.edit_mode;
        }

        // Right-aligned plan name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let modified = if app.file_path.is_some() { "" } else { " (unsaved)" };
            ui.label(
                RichText::new(format!("{}{}", app.plan.name, modified))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
