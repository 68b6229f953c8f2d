#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, file: TestFile) -> Self {
        Self { name, group, file }
    }

    pub fn small(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Small, file)
    }

    pub fn large(name: &'static str, file: TestFile) -> Self {
        Self::new(name, TestGroup::Large, file)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    pub fn file_name(&self) -> &'static str {
        self.file().file_name
    }

    /// Upload content for this case; large cases repeat the fixture rows.
    pub fn content(&self) -> String {
        match self.group {
            TestGroup::Small => self.file.content.to_owned(),
            TestGroup::Large => self.file.repeat_rows(LARGE_REPEAT),
        }
    }
}

const LARGE_REPEAT: usize = 10_000;

#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn content(&self) -> &'static str {
        self.content
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    /// Keeps the header line once and repeats every following line `times` times.
    pub fn repeat_rows(&self, times: usize) -> String {
        let (header, rows) = self.content.split_once('\n').unwrap_or((self.content, ""));
        let mut content = String::with_capacity(header.len() + 1 + rows.len() * times);
        content.push_str(header);
        content.push('\n');
        for _ in 0..times {
            content.push_str(rows);
        }
        content
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Large,
}
