/// Issue counter for one kind of request. Only the latest issued ticket may apply its result.
#[derive(Debug, Default)]
pub(crate) struct Generation {
    latest: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

impl Generation {
    pub(crate) fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub(crate) fn is_current(&self, ticket: Ticket) -> bool {
        self.latest == ticket.0
    }
}
