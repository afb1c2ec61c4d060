use iced::{container, Background, Color};

pub struct Container {
    pub background: Color,
}

impl container::StyleSheet for Container {
    fn style(&self) -> container::Style {
        container::Style {
            background: Some(Background::Color(self.background)),
            ..container::Style::default()
        }
    }
}
