// hide console window on Windows in release
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;

use eframe::egui;
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Vec2};
use versa_docking::{
    DockNodeId, DockTree, DockZone, DockingContext, DockingOptions, EditorLayout, TabStack,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pane {
    Hierarchy,
    Viewport,
    Inspector,
    Console,
}

enum TabEvent {
    Activate(String),
    BeginDrag(String),
    Close(String),
}

struct App {
    docking: DockingContext<Pane>,
    layout: EditorLayout,
    layout_path: PathBuf,
    status: String,
}

impl Default for App {
    fn default() -> Self {
        let options = DockingOptions {
            default_split_ratio: 0.7,
            ..Default::default()
        };
        let layout_path = PathBuf::from("versa_layout.json");
        let mut layout = EditorLayout::with_options(&options);
        if let Err(err) = layout.load_from_file(&layout_path) {
            log::warn!("ignoring layout {}: {err}", layout_path.display());
        }

        let mut docking = DockingContext::new(options);
        let space = docking.create_dock_space("main");
        space.dock_window(Pane::Viewport, "viewport", "Viewport", DockZone::Center);
        space.dock_window(Pane::Console, "console", "Console", DockZone::Center);
        space.split_default(true);
        space.dock_window(Pane::Inspector, "inspector", "Inspector", DockZone::Right);
        space.dock_window(Pane::Hierarchy, "hierarchy", "Hierarchy", DockZone::Right);

        Self {
            docking,
            layout,
            layout_path,
            status: String::new(),
        }
    }
}

fn show_node(ui: &mut egui::Ui, tree: &DockTree, id: DockNodeId) {
    let Some(node) = tree.node(id) else {
        return;
    };
    let title = format!(
        "{} ({:?}, {:.2})",
        if node.name.is_empty() { "<unnamed>" } else { node.name.as_str() },
        node.split_direction,
        node.split_ratio()
    );
    if node.is_leaf() {
        ui.label(title);
    } else {
        egui::CollapsingHeader::new(title)
            .id_salt(id)
            .default_open(true)
            .show(ui, |ui| {
                for &child in node.children() {
                    show_node(ui, tree, child);
                }
            });
    }
}

fn stack_ui(ui: &mut egui::Ui, rect: Rect, stack: &TabStack, events: &mut Vec<TabEvent>) {
    let painter = ui.painter_at(rect);
    painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::GRAY), StrokeKind::Inside);

    let tab_size = Vec2::new(110.0, 22.0);
    for (i, tab) in stack.tabs().iter().enumerate() {
        let offset = Vec2::new(i as f32 * tab_size.x, 0.0);
        let tab_rect = Rect::from_min_size(rect.min + offset, tab_size);
        let response = ui.interact(tab_rect, ui.id().with(&tab.id), Sense::click_and_drag());
        let active = stack.is_active(&tab.id);
        let fill = if active {
            ui.visuals().selection.bg_fill
        } else {
            ui.visuals().faint_bg_color
        };
        painter.rect_filled(tab_rect, 2.0, fill);
        painter.text(
            tab_rect.center(),
            Align2::CENTER_CENTER,
            &tab.label,
            FontId::proportional(13.0),
            ui.visuals().text_color(),
        );

        if response.drag_started() {
            events.push(TabEvent::BeginDrag(tab.id.clone()));
        } else if response.clicked() {
            events.push(TabEvent::Activate(tab.id.clone()));
        } else if response.middle_clicked() && tab.can_close {
            events.push(TabEvent::Close(tab.id.clone()));
        }
    }

    if let Some(tab) = stack.active_tab() {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            format!("{} content", tab.label),
            FontId::proportional(16.0),
            ui.visuals().weak_text_color(),
        );
    }
}

impl App {
    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Reset layout").clicked() {
                self.layout.reset();
                self.status = "layout reset".to_owned();
            }
            if ui.button("Save layout").clicked() {
                self.status = match self.layout.save_to_file(&self.layout_path) {
                    Ok(()) => format!("saved {}", self.layout_path.display()),
                    Err(err) => format!("save failed: {err}"),
                };
            }
            if ui.button("Load layout").clicked() {
                self.status = match self.layout.load_from_file(&self.layout_path) {
                    Ok(true) => format!("loaded {}", self.layout_path.display()),
                    Ok(false) => "no saved layout".to_owned(),
                    Err(err) => format!("load failed: {err}"),
                };
            }
            ui.label(&self.status);
        });
    }

    fn dock_space_ui(&mut self, ui: &mut egui::Ui) {
        let rect = ui.available_rect_before_wrap();
        let Some(space) = self.docking.root_dock_space_mut() else {
            ui.label("no dock space");
            return;
        };
        space.set_rect(rect);

        let mut areas: Vec<(Rect, TabStack)> = Vec::new();
        if space.splits().is_empty() {
            areas.push((rect, space.root_tabs().clone()));
        } else {
            for (split, (first, second)) in space.splits().iter().zip(space.split_rects()) {
                areas.push((first, split.first.clone()));
                areas.push((second, split.second.clone()));
            }
            if !space.root_tabs().is_empty() {
                let strip = Rect::from_min_max(Pos2::new(rect.min.x, rect.max.y - 60.0), rect.max);
                areas.push((strip, space.root_tabs().clone()));
            }
        }

        let mut events = Vec::new();
        for (area, stack) in &areas {
            stack_ui(ui, *area, stack, &mut events);
        }
        for event in events {
            match event {
                TabEvent::Activate(id) => {
                    space.activate_tab(&id);
                }
                TabEvent::BeginDrag(id) => {
                    space.begin_drag(&id);
                }
                TabEvent::Close(id) => {
                    space.close_tab(&id);
                }
            }
        }

        if space.dragging().is_some() {
            if let Some(pointer) = ui.ctx().pointer_latest_pos() {
                space.update_drag_preview(pointer);
            }
            if ui.input(|i| i.pointer.any_released()) {
                space.end_drag();
            }
        }

        space.paint(ui.painter());
        ui.allocate_rect(rect, Sense::hover());
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| self.top_bar(ui));

        egui::SidePanel::left("layout_tree").show(ctx, |ui| {
            ui.heading("Editor layout");
            let tree = self.layout.tree();
            show_node(ui, tree, tree.root());
            ui.separator();
            let zone = self
                .docking
                .root_dock_space()
                .map(|s| s.preview().zone())
                .unwrap_or_default();
            ui.label(format!("drop zone: {zone:?}"));
        });

        egui::CentralPanel::default().show(ctx, |ui| self.dock_space_ui(ui));
    }
}

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("versa_docking: dock layout"),
        ..Default::default()
    };
    eframe::run_native(
        "versa_docking: dock layout",
        options,
        Box::new(|_cc| Ok(Box::new(App::default()))),
    )
}
