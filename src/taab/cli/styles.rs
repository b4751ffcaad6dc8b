use console::Style;
use once_cell::sync::Lazy;

pub struct TableStyles {
    pub header: Style,
    pub index: Style,
    pub card: Style,
    pub time: Style,
    pub editing: Style,
    pub prompt: Style,
}

pub static TABLE_STYLES: Lazy<TableStyles> = Lazy::new(|| TableStyles {
    header: Style::new().bold().underlined(),
    index: Style::new().yellow(),
    card: Style::new().cyan().bold(),
    time: Style::new().color256(246).italic(),
    editing: Style::new().magenta(),
    prompt: Style::new().bold(),
});
