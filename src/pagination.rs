/// Découpe une liste en pages de taille fixe.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
    items: Vec<T>,
    per_page: usize,
}

/// Une page de résultats (numérotation à partir de 1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub number: usize,
    pub num_pages: usize,
    pub count: usize,
    pub per_page: usize,
    pub items: Vec<T>,
}

impl<T: Clone> Paginator<T> {
    /// `per_page` vaut au moins 1.
    pub fn new(items: Vec<T>, per_page: usize) -> Self {
        Self { items, per_page: per_page.max(1) }
    }

    /// Une liste vide compte quand même une page.
    pub fn num_pages(&self) -> usize {
        self.items.len().div_ceil(self.per_page).max(1)
    }

    /// Page demandée sous forme brute : absente ou non numérique donne la
    /// première page, hors bornes donne la dernière.
    pub fn page(&self, raw: Option<&str>) -> Page<T> {
        let last = self.num_pages();
        let number = match raw.map(str::trim).map(str::parse::<i64>) {
            None | Some(Err(_)) => 1,
            Some(Ok(n)) if n < 1 => last,
            Some(Ok(n)) => usize::try_from(n).map_or(last, |n| n.min(last)),
        };
        self.page_number(number)
    }

    fn page_number(&self, number: usize) -> Page<T> {
        let start = (number - 1) * self.per_page;
        let end = (start + self.per_page).min(self.items.len());
        let items = self.items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();
        Page {
            number,
            num_pages: self.num_pages(),
            count: self.items.len(),
            per_page: self.per_page,
            items,
        }
    }
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
    pub fn next_page_number(&self) -> Option<usize> {
        self.has_next().then(|| self.number + 1)
    }
    pub fn previous_page_number(&self) -> Option<usize> {
        self.has_previous().then(|| self.number - 1)
    }
    /// Index (1-based) du premier élément, 0 si la page est vide.
    pub fn start_index(&self) -> usize {
        if self.count == 0 {
            0
        } else {
            (self.number - 1) * self.per_page + 1
        }
    }
    pub fn end_index(&self) -> usize {
        if self.count == 0 {
            0
        } else {
            self.start_index() + self.items.len() - 1
        }
    }
}
