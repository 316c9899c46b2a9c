#[derive(Debug, Clone, Copy)]
pub struct SourceChar {
    pub value: char,
    pub offset: u32,
}
